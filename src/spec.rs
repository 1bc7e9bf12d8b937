//! Variant Generation Requests
//!
//! A [`GenerationSpec`] describes one layer of a variant chain: the
//! capabilities guaranteed by the ancestor chain (`parent`) and the delta to
//! generate at this layer (`generate`). Validation happens at construction,
//! so a spec that exists is always well-formed and composition itself cannot
//! fail.
//!
//! # Invariants
//!
//! - `generate ∩ parent = ∅`: a layer never re-adds state already present in
//!   an ancestor. Violations are specification errors in the caller and are
//!   rejected immediately, before anything is emitted.
//! - The variant name is the canonical type name of the *effective* set
//!   (`parent ∪ generate`), so identical capability sets always resolve to
//!   the same name regardless of how the chain was sliced.
//!
//! # Examples
//!
//! ```
//! use cache_compose::feature::{Feature, FeatureSet};
//! use cache_compose::spec::GenerationSpec;
//!
//! let parent = FeatureSet::of(&[Feature::MaximumSize]);
//! let generate = FeatureSet::of(&[Feature::ExpireAccess]);
//! let spec = GenerationSpec::new(parent, generate).unwrap();
//! assert_eq!(spec.variant_name(), "ExpireAccessMaximumSize");
//!
//! // Overlapping sets are a specification violation.
//! assert!(GenerationSpec::new(parent, parent).is_err());
//! ```

extern crate alloc;

use alloc::string::String;
use core::fmt;

use crate::feature::{Feature, FeatureSet, UnknownFeatureError};

/// Error produced when a capability request is malformed.
///
/// Every variant is a programming error in the caller building the request;
/// none is recoverable at runtime and nothing is emitted before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A feature token did not match the closed vocabulary.
    UnknownFeature(UnknownFeatureError),
    /// The generate set re-adds features already present in the parent.
    OverlappingFeatures(FeatureSet),
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::UnknownFeature(err) => err.fmt(f),
            SpecError::OverlappingFeatures(overlap) => write!(
                f,
                "generate features overlap parent features: {overlap:?}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SpecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpecError::UnknownFeature(err) => Some(err),
            SpecError::OverlappingFeatures(_) => None,
        }
    }
}

impl From<UnknownFeatureError> for SpecError {
    fn from(err: UnknownFeatureError) -> Self {
        SpecError::UnknownFeature(err)
    }
}

/// One layer of a variant inheritance chain.
///
/// Holds the ancestor capability set, the delta generated at this layer, and
/// the canonical name of the variant the layer produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSpec {
    parent: FeatureSet,
    generate: FeatureSet,
    variant_name: String,
}

impl GenerationSpec {
    /// Validates and builds a spec for one layer.
    ///
    /// Fails with [`SpecError::OverlappingFeatures`] when `generate` is not
    /// disjoint from `parent`.
    pub fn new(parent: FeatureSet, generate: FeatureSet) -> Result<Self, SpecError> {
        if !parent.is_disjoint(generate) {
            return Err(SpecError::OverlappingFeatures(parent.intersection(generate)));
        }
        let variant_name = parent.union(generate).type_name();
        Ok(Self {
            parent,
            generate,
            variant_name,
        })
    }

    /// Builds a spec from `UPPER_SNAKE` feature tokens.
    ///
    /// Fails fast on the first unrecognized token or on overlap.
    pub fn from_tokens(parent: &[&str], generate: &[&str]) -> Result<Self, SpecError> {
        let mut parent_set = FeatureSet::EMPTY;
        for token in parent {
            parent_set.insert(Feature::from_token(token)?);
        }
        let mut generate_set = FeatureSet::EMPTY;
        for token in generate {
            generate_set.insert(Feature::from_token(token)?);
        }
        Self::new(parent_set, generate_set)
    }

    /// The capabilities guaranteed present by the ancestor chain.
    pub fn parent(&self) -> FeatureSet {
        self.parent
    }

    /// The capability delta to generate at this layer.
    pub fn generate(&self) -> FeatureSet {
        self.generate
    }

    /// The full capability set visible at this layer: `parent ∪ generate`.
    ///
    /// Derived predicates must be evaluated against this set, never against
    /// the delta alone, when deciding whether shared infrastructure has
    /// already been allocated by an ancestor.
    pub fn effective(&self) -> FeatureSet {
        self.parent.union(self.generate)
    }

    /// The canonical type name of the variant this layer produces.
    pub fn variant_name(&self) -> &str {
        &self.variant_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_disjoint_sets() {
        let spec = GenerationSpec::new(
            FeatureSet::of(&[Feature::MaximumSize]),
            FeatureSet::of(&[Feature::ExpireAccess]),
        )
        .unwrap();
        assert_eq!(
            spec.effective(),
            FeatureSet::of(&[Feature::MaximumSize, Feature::ExpireAccess])
        );
    }

    #[test]
    fn rejects_overlap() {
        let set = FeatureSet::of(&[Feature::MaximumSize]);
        let err = GenerationSpec::new(set, set).unwrap_err();
        assert_eq!(err, SpecError::OverlappingFeatures(set));
    }

    #[test]
    fn name_ignores_chain_slicing() {
        let layered = GenerationSpec::new(
            FeatureSet::of(&[Feature::WeakKeys]),
            FeatureSet::of(&[Feature::Stats]),
        )
        .unwrap();
        let flat = GenerationSpec::new(
            FeatureSet::EMPTY,
            FeatureSet::of(&[Feature::Stats, Feature::WeakKeys]),
        )
        .unwrap();
        assert_eq!(layered.variant_name(), flat.variant_name());
    }

    #[test]
    fn from_tokens_fails_fast_on_unknown() {
        let err = GenerationSpec::from_tokens(&["WEAK_KEYS"], &["PHANTOM"]).unwrap_err();
        assert!(matches!(err, SpecError::UnknownFeature(_)));
    }
}

//! Variant Registry
//!
//! The combinatorial family of legal capability sets can reach thousands of
//! members, but chains built in a canonical order share almost all of their
//! ancestors. The registry exploits that: a requested [`FeatureSet`] is
//! decomposed into a chain of cumulative prefixes in feature declaration
//! order, every prefix is memoized under its canonical variant name, and a
//! layer already seen by an earlier request is reused instead of being
//! regenerated.
//!
//! The registry is a one-time, single-threaded composition step; nothing
//! here is touched on a cache's hot path.
//!
//! # Examples
//!
//! ```
//! use cache_compose::feature::{Feature, FeatureSet};
//! use cache_compose::registry::VariantRegistry;
//!
//! let mut registry = VariantRegistry::new();
//! let chain = registry
//!     .chain(FeatureSet::of(&[Feature::WeakKeys, Feature::MaximumSize]))
//!     .unwrap();
//! assert_eq!(chain, ["WeakKeys", "WeakKeysMaximumSize"]);
//!
//! // A second request with a shared prefix reuses the memoized ancestor.
//! let other = registry
//!     .chain(FeatureSet::of(&[Feature::WeakKeys, Feature::Stats]))
//!     .unwrap();
//! assert_eq!(other, ["WeakKeys", "WeakKeysStats"]);
//! assert_eq!(registry.len(), 3);
//! ```

extern crate alloc;

#[cfg(not(feature = "hashbrown"))]
extern crate std;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

use crate::composer::VariantComposer;
use crate::emit::VariantSchema;
use crate::feature::FeatureSet;
use crate::spec::{GenerationSpec, SpecError};

/// A memoized directed acyclic graph of [`GenerationSpec`]s keyed by
/// canonical variant name, with lazily composed [`VariantSchema`]s.
#[derive(Debug, Default)]
pub struct VariantRegistry {
    specs: HashMap<String, GenerationSpec>,
    schemas: HashMap<String, VariantSchema>,
}

impl VariantRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
            schemas: HashMap::new(),
        }
    }

    /// Number of distinct variants registered so far.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no variant has been registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Looks up a registered spec by canonical variant name.
    pub fn spec(&self, name: &str) -> Option<&GenerationSpec> {
        self.specs.get(name)
    }

    /// Resolves the layered chain for `features`, registering any layer not
    /// seen before, and returns the chain's variant names root to leaf.
    ///
    /// The decomposition adds one feature per layer in declaration order,
    /// the canonical tie-break, so requests that share a prefix share the
    /// memoized ancestors. An empty set resolves to an empty chain.
    pub fn chain(&mut self, features: FeatureSet) -> Result<Vec<String>, SpecError> {
        let mut names = Vec::with_capacity(features.len());
        let mut prefix = FeatureSet::EMPTY;
        for feature in features.iter() {
            let parent = prefix;
            prefix = prefix.with(feature);
            let name = prefix.type_name();
            if !self.specs.contains_key(&name) {
                let spec = GenerationSpec::new(parent, FeatureSet::of(&[feature]))?;
                self.specs.insert(name.clone(), spec);
            }
            names.push(name);
        }
        Ok(names)
    }

    /// Returns the composed schema for a registered variant, composing it on
    /// first use. Each layer is composed at most once for the lifetime of
    /// the registry.
    pub fn schema(&mut self, name: &str) -> Option<&VariantSchema> {
        if !self.schemas.contains_key(name) {
            let spec = self.specs.get(name)?;
            let mut schema = VariantSchema::new(spec.variant_name());
            VariantComposer::compose(spec, &mut schema);
            self.schemas.insert(String::from(name), schema);
        }
        self.schemas.get(name)
    }

    /// Resolves `features` and returns the composed schema of every chain
    /// layer, root to leaf.
    pub fn materialize(&mut self, features: FeatureSet) -> Result<Vec<VariantSchema>, SpecError> {
        let names = self.chain(features)?;
        let mut schemas = Vec::with_capacity(names.len());
        for name in &names {
            // The name came out of `chain`, so the spec is registered.
            if let Some(schema) = self.schema(name) {
                schemas.push(schema.clone());
            }
        }
        Ok(schemas)
    }
}

//! Cache Capability Vocabulary
//!
//! This module defines the closed set of orthogonal capabilities that a cache
//! variant may be composed from, the [`FeatureSet`] collection over them, and
//! the derived predicates that decide which shared infrastructure a
//! combination of capabilities requires.
//!
//! # Features
//!
//! | Feature | Capability |
//! |---------|------------|
//! | `StrongKeys` / `WeakKeys` | key reference strength |
//! | `StrongValues` / `InfirmValues` / `WeakValues` / `SoftValues` | value reference strength |
//! | `ExpireAccess` / `ExpireWrite` / `RefreshWrite` | time-based expiration and refresh |
//! | `MaximumSize` / `MaximumWeight` | size and weight bounding |
//! | `Loading` | automatic value computation |
//! | `Listening` | removal notification |
//! | `Executor` | custom task submission |
//! | `Stats` | statistics recording |
//!
//! Features are totally ordered by declaration order. That order is the
//! canonical tie-break everywhere a set of features is serialized, so two
//! sets holding the same members always produce identical names regardless
//! of the order they were built in.
//!
//! # Derived predicates
//!
//! Predicates are pure functions of a [`FeatureSet`], recomputed on demand
//! and monotone in their constituent features (adding a qualifying feature
//! never turns a predicate off):
//!
//! | Predicate | True when the set contains |
//! |-----------|----------------------------|
//! | [`uses_access_order_deque`](FeatureSet::uses_access_order_deque) | size bound, weight bound, or access expiration |
//! | [`uses_write_order_deque`](FeatureSet::uses_write_order_deque) | write expiration |
//! | [`uses_write_queue`](FeatureSet::uses_write_queue) | any bound, expiration, or refresh |
//! | [`uses_write_time`](FeatureSet::uses_write_time) | write expiration or refresh |
//! | [`uses_ticker`](FeatureSet::uses_ticker) | stats, expiration, or refresh |
//! | [`uses_maximum`](FeatureSet::uses_maximum) | size or weight bound |
//! | [`needs_read_buffer`](FeatureSet::needs_read_buffer) | a maximum or access expiration |
//!
//! # Examples
//!
//! ```
//! use cache_compose::feature::{Feature, FeatureSet};
//!
//! let set = FeatureSet::of(&[Feature::WeakKeys, Feature::MaximumSize]);
//! assert!(set.uses_maximum());
//! assert!(set.needs_read_buffer());
//! assert!(!set.uses_ticker());
//! assert_eq!(set.enum_name(), "WEAK_KEYS_MAXIMUM_SIZE");
//! assert_eq!(set.type_name(), "WeakKeysMaximumSize");
//! ```

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// A single orthogonal cache capability.
///
/// The vocabulary is closed: variants are identity-comparable and totally
/// ordered by declaration order, which is the canonical serialization order
/// for name generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Feature {
    /// Keys are held with strong references.
    StrongKeys,
    /// Keys are held with weak references and collected when unreachable.
    WeakKeys,
    /// Values are held with strong references.
    StrongValues,
    /// Values are held with any non-strong reference strength.
    InfirmValues,
    /// Values are held with weak references.
    WeakValues,
    /// Values are held with soft references.
    SoftValues,
    /// Entries expire after a fixed duration since last access.
    ExpireAccess,
    /// Entries expire after a fixed duration since last write.
    ExpireWrite,
    /// Entries are refreshed after a fixed duration since last write.
    RefreshWrite,
    /// The cache is bounded by a maximum entry count.
    MaximumSize,
    /// The cache is bounded by a maximum total weight.
    MaximumWeight,
    /// Values are computed through a loader on a miss.
    Loading,
    /// Removals are published to a listener.
    Listening,
    /// Asynchronous work is submitted to a caller-supplied executor.
    Executor,
    /// Cache operations are recorded by a statistics counter.
    Stats,
}

impl Feature {
    /// Every feature, in declaration order.
    pub const ALL: [Feature; 15] = [
        Feature::StrongKeys,
        Feature::WeakKeys,
        Feature::StrongValues,
        Feature::InfirmValues,
        Feature::WeakValues,
        Feature::SoftValues,
        Feature::ExpireAccess,
        Feature::ExpireWrite,
        Feature::RefreshWrite,
        Feature::MaximumSize,
        Feature::MaximumWeight,
        Feature::Loading,
        Feature::Listening,
        Feature::Executor,
        Feature::Stats,
    ];

    /// Returns the canonical `UPPER_SNAKE` token for this feature.
    pub fn token(self) -> &'static str {
        match self {
            Feature::StrongKeys => "STRONG_KEYS",
            Feature::WeakKeys => "WEAK_KEYS",
            Feature::StrongValues => "STRONG_VALUES",
            Feature::InfirmValues => "INFIRM_VALUES",
            Feature::WeakValues => "WEAK_VALUES",
            Feature::SoftValues => "SOFT_VALUES",
            Feature::ExpireAccess => "EXPIRE_ACCESS",
            Feature::ExpireWrite => "EXPIRE_WRITE",
            Feature::RefreshWrite => "REFRESH_WRITE",
            Feature::MaximumSize => "MAXIMUM_SIZE",
            Feature::MaximumWeight => "MAXIMUM_WEIGHT",
            Feature::Loading => "LOADING",
            Feature::Listening => "LISTENING",
            Feature::Executor => "EXECUTOR",
            Feature::Stats => "STATS",
        }
    }

    /// Parses a single `UPPER_SNAKE` token back into a feature.
    ///
    /// An unrecognized token is a configuration error in the caller and is
    /// reported immediately rather than producing a malformed name later.
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_compose::feature::Feature;
    ///
    /// assert_eq!(Feature::from_token("WEAK_KEYS"), Ok(Feature::WeakKeys));
    /// assert!(Feature::from_token("PHANTOM_KEYS").is_err());
    /// ```
    pub fn from_token(token: &str) -> Result<Feature, UnknownFeatureError> {
        Feature::ALL
            .iter()
            .copied()
            .find(|feature| feature.token() == token)
            .ok_or_else(|| UnknownFeatureError::new(token))
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when a name contains a token outside the closed feature
/// vocabulary.
///
/// This indicates a programming error in the caller building a variant
/// request, not a runtime condition to recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeatureError {
    token: String,
}

impl UnknownFeatureError {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the token that failed to match any feature.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for UnknownFeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized feature token `{}`", self.token)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownFeatureError {}

/// A set of [`Feature`]s with no duplicates.
///
/// Membership is order-irrelevant: two sets are equal iff they contain the
/// same features, however they were constructed. Iteration and serialization
/// always follow declaration order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FeatureSet {
    bits: u16,
}

impl FeatureSet {
    /// The empty set.
    pub const EMPTY: FeatureSet = FeatureSet { bits: 0 };

    /// Creates a set from a slice of features. Duplicates collapse.
    pub fn of(features: &[Feature]) -> Self {
        let mut set = FeatureSet::EMPTY;
        for &feature in features {
            set.insert(feature);
        }
        set
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the number of members.
    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if `feature` is a member.
    pub fn contains(self, feature: Feature) -> bool {
        self.bits & feature.bit() != 0
    }

    /// Adds `feature`, returning `true` if it was not already present.
    pub fn insert(&mut self, feature: Feature) -> bool {
        let inserted = !self.contains(feature);
        self.bits |= feature.bit();
        inserted
    }

    /// Returns a copy of this set with `feature` added.
    pub fn with(self, feature: Feature) -> Self {
        FeatureSet {
            bits: self.bits | feature.bit(),
        }
    }

    /// Returns the union of the two sets.
    pub fn union(self, other: FeatureSet) -> Self {
        FeatureSet {
            bits: self.bits | other.bits,
        }
    }

    /// Returns the intersection of the two sets.
    pub fn intersection(self, other: FeatureSet) -> Self {
        FeatureSet {
            bits: self.bits & other.bits,
        }
    }

    /// Returns `true` if the two sets share no members.
    pub fn is_disjoint(self, other: FeatureSet) -> bool {
        self.bits & other.bits == 0
    }

    /// Returns `true` if every member of this set is a member of `other`.
    pub fn is_subset(self, other: FeatureSet) -> bool {
        self.bits & !other.bits == 0
    }

    /// Iterates the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL
            .iter()
            .copied()
            .filter(move |feature| self.contains(*feature))
    }

    /// Entries are sequenced by access recency when the cache is bounded by
    /// size or weight, or expires entries on access.
    pub fn uses_access_order_deque(self) -> bool {
        self.contains(Feature::MaximumSize)
            || self.contains(Feature::MaximumWeight)
            || self.contains(Feature::ExpireAccess)
    }

    /// Entries are sequenced by write recency when the cache expires entries
    /// on write.
    pub fn uses_write_order_deque(self) -> bool {
        self.contains(Feature::ExpireWrite)
    }

    /// Writes are buffered for replay by the maintenance path when any
    /// bounding, expiration, or refresh capability is present.
    pub fn uses_write_queue(self) -> bool {
        self.contains(Feature::MaximumSize)
            || self.contains(Feature::MaximumWeight)
            || self.contains(Feature::ExpireAccess)
            || self.contains(Feature::ExpireWrite)
            || self.contains(Feature::RefreshWrite)
    }

    /// Entries record their last write timestamp when write expiration or
    /// refresh is present.
    pub fn uses_write_time(self) -> bool {
        self.contains(Feature::ExpireWrite) || self.contains(Feature::RefreshWrite)
    }

    /// A time source is required for stats, expiration, or refresh.
    pub fn uses_ticker(self) -> bool {
        self.contains(Feature::Stats)
            || self.contains(Feature::ExpireAccess)
            || self.contains(Feature::ExpireWrite)
            || self.contains(Feature::RefreshWrite)
    }

    /// A capacity ceiling and running weight total are required when the
    /// cache is bounded by size or weight.
    pub fn uses_maximum(self) -> bool {
        self.contains(Feature::MaximumSize) || self.contains(Feature::MaximumWeight)
    }

    /// A striped read buffer is required to record access events when the
    /// cache is bounded or expires entries on access.
    pub fn needs_read_buffer(self) -> bool {
        self.uses_maximum() || self.contains(Feature::ExpireAccess)
    }

    /// Returns the canonical `UPPER_SNAKE` name: member tokens joined with
    /// `_` in declaration order.
    ///
    /// Identical sets always produce identical names, which is what lets the
    /// variant registry detect an already-generated ancestor.
    pub fn enum_name(self) -> String {
        let mut name = String::new();
        for feature in self.iter() {
            if !name.is_empty() {
                name.push('_');
            }
            name.push_str(feature.token());
        }
        name
    }

    /// Returns the canonical `UpperCamel` type name for this set.
    pub fn type_name(self) -> String {
        type_name_from_enum_name(&self.enum_name())
    }

    /// Parses an `UPPER_SNAKE` name back into a set.
    ///
    /// Member tokens may appear in any order and duplicates collapse, since
    /// membership is all that a set carries; re-serializing through
    /// [`enum_name`](Self::enum_name) always yields the canonical ordering.
    /// No token is a prefix of another, so matching the head of the residue
    /// is unambiguous. Any residue that does not start with a known token
    /// fails fast with an [`UnknownFeatureError`].
    pub fn parse_enum_name(name: &str) -> Result<FeatureSet, UnknownFeatureError> {
        let mut set = FeatureSet::EMPTY;
        let mut rest = name;
        'tokens: while !rest.is_empty() {
            for feature in Feature::ALL {
                if let Some(tail) = rest.strip_prefix(feature.token()) {
                    if tail.is_empty() {
                        set.insert(feature);
                        return Ok(set);
                    }
                    if let Some(tail) = tail.strip_prefix('_') {
                        set.insert(feature);
                        rest = tail;
                        continue 'tokens;
                    }
                }
            }
            return Err(UnknownFeatureError::new(rest));
        }
        Ok(set)
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = FeatureSet::EMPTY;
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl Extend<Feature> for FeatureSet {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        for feature in iter {
            self.insert(feature);
        }
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Converts a canonical `UPPER_SNAKE` name into its `UpperCamel` type-name
/// form.
///
/// The two forms are mutually derivable; see
/// [`enum_name_from_type_name`] for the inverse.
///
/// # Examples
///
/// ```
/// use cache_compose::feature::type_name_from_enum_name;
///
/// assert_eq!(type_name_from_enum_name("WEAK_KEYS_STATS"), "WeakKeysStats");
/// ```
pub fn type_name_from_enum_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            for c in chars {
                out.push(c.to_ascii_lowercase());
            }
        }
    }
    out
}

/// Converts an `UpperCamel` type name into its canonical `UPPER_SNAKE` form.
///
/// Inverse of [`type_name_from_enum_name`].
///
/// # Examples
///
/// ```
/// use cache_compose::feature::enum_name_from_type_name;
///
/// assert_eq!(enum_name_from_type_name("WeakKeysStats"), "WEAK_KEYS_STATS");
/// ```
pub fn enum_name_from_type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() && !out.is_empty() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

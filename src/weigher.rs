//! Entry Weighing
//!
//! Weight-bounded variants compare a running total against an
//! administrator-set ceiling to decide when eviction is required. The
//! [`Weigher`] supplies the per-entry weight; weights have no unit and are
//! only meaningful relative to each other.
//!
//! # Examples
//!
//! ```
//! use cache_compose::weigher::{BoundedWeigher, SingletonWeigher, Weigher};
//!
//! let unit = SingletonWeigher;
//! assert_eq!(unit.weigh(&"key", &"value"), 1);
//!
//! struct ByteWeigher;
//! impl Weigher<&str, Vec<u8>> for ByteWeigher {
//!     fn weigh(&self, _key: &&str, value: &Vec<u8>) -> i32 {
//!         value.len() as i32
//!     }
//! }
//! let bounded = BoundedWeigher::new(ByteWeigher);
//! assert_eq!(bounded.weigh(&"k", &vec![0u8; 16]), 16);
//! ```

/// Upper bound the `maximum` counter is clamped to at construction.
///
/// Leaves headroom below `u64::MAX` so the running weight total can
/// transiently overshoot the ceiling without wrapping.
pub const MAXIMUM_CAPACITY: u64 = u64::MAX - u32::MAX as u64;

/// Calculates the weight of a cache entry.
///
/// Implementations must be thread-safe; the weigher is called on the write
/// path of any thread inserting an entry.
pub trait Weigher<K, V> {
    /// Returns the weight of the entry. Must be non-negative.
    fn weigh(&self, key: &K, value: &V) -> i32;
}

/// A weigher assigning every entry a weight of one, turning a weight bound
/// into an entry-count bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingletonWeigher;

impl<K, V> Weigher<K, V> for SingletonWeigher {
    fn weigh(&self, _key: &K, _value: &V) -> i32 {
        1
    }
}

/// A weigher enforcing that the delegate produces a non-negative weight.
///
/// A negative weight is a usage error in the delegate and is surfaced
/// immediately to the caller rather than silently corrupting the running
/// total.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedWeigher<W> {
    delegate: W,
}

impl<W> BoundedWeigher<W> {
    /// Wraps `delegate` with non-negativity enforcement.
    pub fn new(delegate: W) -> Self {
        Self { delegate }
    }

    /// Returns the wrapped weigher.
    pub fn into_inner(self) -> W {
        self.delegate
    }
}

impl<K, V, W: Weigher<K, V>> Weigher<K, V> for BoundedWeigher<W> {
    /// # Panics
    ///
    /// Panics when the delegate returns a negative weight.
    fn weigh(&self, key: &K, value: &V) -> i32 {
        let weight = self.delegate.weigh(key, value);
        assert!(weight >= 0, "weigher produced a negative weight: {weight}");
        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWeigher(i32);

    impl Weigher<u32, u32> for FixedWeigher {
        fn weigh(&self, _key: &u32, _value: &u32) -> i32 {
            self.0
        }
    }

    #[test]
    fn singleton_weighs_one() {
        assert_eq!(SingletonWeigher.weigh(&1u32, &2u32), 1);
    }

    #[test]
    fn bounded_passes_through_valid_weights() {
        let weigher = BoundedWeigher::new(FixedWeigher(42));
        assert_eq!(weigher.weigh(&0, &0), 42);
        assert_eq!(BoundedWeigher::new(FixedWeigher(0)).weigh(&0, &0), 0);
    }

    #[test]
    #[should_panic(expected = "negative weight")]
    fn bounded_rejects_negative_weights() {
        let weigher = BoundedWeigher::new(FixedWeigher(-1));
        let _ = weigher.weigh(&0, &0);
    }

    #[test]
    fn capacity_leaves_overshoot_headroom() {
        assert!(MAXIMUM_CAPACITY < u64::MAX);
        assert!(MAXIMUM_CAPACITY > u64::MAX / 2);
    }
}

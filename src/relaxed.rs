//! Relaxed Atomic Cells
//!
//! Lock-free building blocks for publishing mutable state across threads
//! without full synchronization. Generated cache variants use these for
//! their single-writer counters (`maximum`, `weighted_size`, per-stripe
//! read/write counts) and for the slots of the striped read buffer.
//!
//! # Memory-ordering contract
//!
//! - [`RelaxedCounter::load`] and [`RelaxedCounter::store`] use
//!   `Ordering::Relaxed`: a store becomes visible to other threads
//!   eventually, stores from the counter's sole writer stay totally ordered
//!   with respect to each other, and a load never observes a value that was
//!   never stored. Neither operation is a synchronization point for any
//!   other memory access.
//! - [`RelaxedRef::load`] and [`RelaxedRef::store`] carry the same relaxed
//!   contract for a pointer-sized slot.
//! - [`RelaxedCounter::compare_and_swap`] and
//!   [`RelaxedRef::compare_and_swap`] are the operations with cross-thread
//!   ordering guarantees: an atomic, linearizable exchange at
//!   acquire-release strength, used to claim a shared counter value or slot
//!   under contention.
//!
//! # Ownership
//!
//! Cells are non-owning. A [`RelaxedRef`] holds a raw pointer and never
//! reads through or frees it; pointee lifetime is managed by whoever put the
//! pointer in (in this crate, the read buffer's single consumer). Each cell
//! is allocated once at variant construction, owned exclusively by the
//! embedding instance, and released with it.
//!
//! # Examples
//!
//! ```
//! use cache_compose::relaxed::RelaxedCounter;
//!
//! let weighted_size = RelaxedCounter::new(0);
//! weighted_size.store(weighted_size.load() + 3);
//! assert_eq!(weighted_size.load(), 3);
//! ```

use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicPtr, AtomicU64, Ordering};

/// A 64-bit counter supporting relaxed reads and writes plus an
/// acquire-release compare-and-swap.
///
/// Most instances follow a single-writer discipline (the maintenance path
/// owns `maximum`, `weighted_size`, and the per-stripe read counts); a
/// counter contended by many writers, such as a stripe's write count, is
/// advanced through [`compare_and_swap`](Self::compare_and_swap) instead of
/// [`store`](Self::store).
#[derive(Default)]
pub struct RelaxedCounter {
    value: AtomicU64,
}

impl RelaxedCounter {
    /// Creates a counter holding `value`.
    pub const fn new(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }

    /// Returns a relaxed read of the last known value.
    ///
    /// May be stale relative to a concurrently racing store.
    #[inline]
    pub fn load(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Eventually sets the counter to `value`.
    ///
    /// Must not be used as a synchronization point for any other memory
    /// access.
    #[inline]
    pub fn store(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    /// Atomically replaces `expected` with `updated`, returning `true` on
    /// success.
    ///
    /// Acquire-release strength: of any set of racing calls with the same
    /// expected value, exactly one succeeds. This is how contended counters
    /// are advanced; a monotone counter claimed this way can never move
    /// backwards.
    #[inline]
    pub fn compare_and_swap(&self, expected: u64, updated: u64) -> bool {
        self.value
            .compare_exchange(expected, updated, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl fmt::Debug for RelaxedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelaxedCounter").field(&self.load()).finish()
    }
}

/// A reference slot supporting relaxed reads and writes plus an
/// acquire-release compare-and-swap.
///
/// A null pointer means the slot is empty. The cell does not own the
/// pointee: it is never dereferenced or dropped here.
pub struct RelaxedRef<T> {
    value: AtomicPtr<T>,
}

impl<T> RelaxedRef<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            value: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Returns a relaxed read of the last known pointer, or null when the
    /// slot is empty. Same staleness contract as [`RelaxedCounter::load`].
    #[inline]
    pub fn load(&self) -> *mut T {
        self.value.load(Ordering::Relaxed)
    }

    /// Eventually sets the slot to `ptr`.
    #[inline]
    pub fn store(&self, ptr: *mut T) {
        self.value.store(ptr, Ordering::Relaxed);
    }

    /// Returns `true` if the last known value is null.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.load().is_null()
    }

    /// Atomically replaces `expected` with `updated`, returning `true` on
    /// success.
    ///
    /// Acquire-release strength: of any set of racing calls with the same
    /// expected value, exactly one succeeds, and the losers observe the
    /// winner's value on their next load. This is the only operation on the
    /// cell that orders other memory accesses.
    #[inline]
    pub fn compare_and_swap(&self, expected: *mut T, updated: *mut T) -> bool {
        self.value
            .compare_exchange(expected, updated, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl<T> Default for RelaxedRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RelaxedRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelaxedRef").field(&self.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_round_trips() {
        let counter = RelaxedCounter::new(7);
        assert_eq!(counter.load(), 7);
        counter.store(11);
        assert_eq!(counter.load(), 11);
    }

    #[test]
    fn counter_defaults_to_zero() {
        let counter = RelaxedCounter::default();
        assert_eq!(counter.load(), 0);
    }

    #[test]
    fn counter_compare_and_swap_claims_once() {
        let counter = RelaxedCounter::new(4);
        assert!(counter.compare_and_swap(4, 5));
        // The value moved on; a claim against the old value fails.
        assert!(!counter.compare_and_swap(4, 6));
        assert_eq!(counter.load(), 5);
    }

    #[test]
    fn reference_starts_empty() {
        let cell: RelaxedRef<u32> = RelaxedRef::new();
        assert!(cell.is_empty());
        assert!(cell.load().is_null());
    }

    #[test]
    fn reference_stores_and_clears() {
        let mut value = 5u32;
        let cell: RelaxedRef<u32> = RelaxedRef::new();
        cell.store(&mut value);
        assert!(!cell.is_empty());
        assert_eq!(cell.load(), &mut value as *mut u32);
        cell.store(core::ptr::null_mut());
        assert!(cell.is_empty());
    }

    #[test]
    fn compare_and_swap_claims_once() {
        let mut a = 1u32;
        let mut b = 2u32;
        let cell: RelaxedRef<u32> = RelaxedRef::new();
        assert!(cell.compare_and_swap(core::ptr::null_mut(), &mut a));
        // The slot is taken; a second claim against empty fails.
        assert!(!cell.compare_and_swap(core::ptr::null_mut(), &mut b));
        assert_eq!(cell.load(), &mut a as *mut u32);
        // Swapping from the current value succeeds.
        assert!(cell.compare_and_swap(&mut a, &mut b));
        assert_eq!(cell.load(), &mut b as *mut u32);
    }
}

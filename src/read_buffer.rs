//! Striped Lossy Read Buffer
//!
//! Bounded variants record read events so the maintenance path can replay
//! them against the eviction policy, but reads must never contend on a
//! single counter. The buffer is therefore striped: producers are spread
//! across [`READ_BUFFER_COUNT`] independent lanes by a caller-supplied
//! hint (typically a hash of the current thread), and each stripe holds a
//! fixed ring of [`READ_BUFFER_SIZE`] relaxed reference slots plus a relaxed
//! write/read counter pair.
//!
//! # Access pattern
//!
//! - **Many producers per stripe**: any thread may call
//!   [`record`](ReadBuffer::record). A producer claims the next write index
//!   with a single compare-and-swap on the stripe's write count and only
//!   then publishes the event into the claimed slot, so the write count
//!   increases monotonically by construction. A lost race or a full stripe
//!   drops the event. The buffer is lossy by design: read events are
//!   samples, not a ledger.
//! - **Single consumer per stripe at any instant**: only the maintenance
//!   path may [`drain`](ReadBuffer::drain) a stripe. The read count is
//!   advanced only by the consumer and never exceeds the write count.
//! - **No cross-stripe ordering** is guaranteed or required.
//!
//! All operations are non-blocking and complete in bounded time; the only
//! retry anywhere is the single CAS of an index claim, and a failed claim
//! returns immediately instead of retrying.
//!
//! # Examples
//!
//! ```
//! use cache_compose::read_buffer::{ReadBuffer, RecordStatus};
//!
//! let buffer: ReadBuffer<u64> = ReadBuffer::new();
//! let mut node = 42u64;
//! assert_eq!(buffer.record(0, &mut node), RecordStatus::Recorded);
//!
//! let mut drained = Vec::new();
//! buffer.drain(|ptr| drained.push(ptr));
//! assert_eq!(drained, [&mut node as *mut u64]);
//! ```

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ptr;

use crate::relaxed::{RelaxedCounter, RelaxedRef};

/// Number of independent stripes. Power of two so a hint can be masked.
pub const READ_BUFFER_COUNT: usize = 16;

/// Slots per stripe. Power of two so counters can be masked into indices.
pub const READ_BUFFER_SIZE: usize = 128;

const STRIPE_MASK: usize = READ_BUFFER_COUNT - 1;
const SLOT_MASK: usize = READ_BUFFER_SIZE - 1;

/// Outcome of recording a read event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// The event was published into a slot.
    Recorded,
    /// The stripe was full or the index claim was lost; the event is dropped.
    Full,
}

/// One lane of the striped buffer: a fixed ring of relaxed reference slots
/// and a relaxed write/read counter pair.
pub struct ReadBufferStripe<T> {
    slots: [RelaxedRef<T>; READ_BUFFER_SIZE],
    write_count: RelaxedCounter,
    read_count: RelaxedCounter,
}

impl<T> ReadBufferStripe<T> {
    /// Creates an empty stripe with all slots initialized.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| RelaxedRef::new()),
            write_count: RelaxedCounter::new(0),
            read_count: RelaxedCounter::new(0),
        }
    }

    /// Publishes a read event into this stripe.
    ///
    /// Any thread may call this. The next write index is claimed by
    /// compare-and-swap on the write count before the slot is touched, so
    /// the count strictly increases per published slot and a claimed index
    /// is never contended: the slot it maps onto was drained before the
    /// full check could pass.
    pub fn record(&self, node: *mut T) -> RecordStatus {
        let head = self.read_count.load();
        let tail = self.write_count.load();
        if tail.wrapping_sub(head) >= READ_BUFFER_SIZE as u64 {
            return RecordStatus::Full;
        }
        if self.write_count.compare_and_swap(tail, tail.wrapping_add(1)) {
            self.slots[(tail as usize) & SLOT_MASK].store(node);
            RecordStatus::Recorded
        } else {
            // Lost the claim to a racing producer; drop the sample.
            RecordStatus::Full
        }
    }

    /// Number of published events not yet drained, as last observed.
    pub fn pending(&self) -> u64 {
        self.write_count.load().wrapping_sub(self.read_count.load())
    }

    /// Last observed write count. Strictly increasing per published slot.
    pub fn write_count(&self) -> u64 {
        self.write_count.load()
    }

    /// Last observed read count. Advanced only by the consumer; never
    /// exceeds the write count.
    pub fn read_count(&self) -> u64 {
        self.read_count.load()
    }

    /// Consumes pending events in publication order, clearing each slot.
    ///
    /// Contract: at most one consumer per stripe at any instant. A slot
    /// whose publication is not yet visible ends the pass early; the events
    /// remain for the next drain.
    pub fn drain<F: FnMut(*mut T)>(&self, f: &mut F) -> usize {
        let head = self.write_count.load();
        let mut tail = self.read_count.load();
        let mut drained = 0;
        while tail != head {
            let slot = &self.slots[(tail as usize) & SLOT_MASK];
            let node = slot.load();
            if node.is_null() {
                break;
            }
            slot.store(ptr::null_mut());
            tail = tail.wrapping_add(1);
            self.read_count.store(tail);
            f(node);
            drained += 1;
        }
        drained
    }
}

impl<T> Default for ReadBufferStripe<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The striped read buffer owned by a bounded variant instance.
///
/// Allocated exactly once, at the lowest chain layer where
/// [`needs_read_buffer`](crate::feature::FeatureSet::needs_read_buffer)
/// first becomes true; every stripe, slot, and counter is initialized at
/// construction. The buffer never owns the recorded nodes.
pub struct ReadBuffer<T> {
    stripes: Box<[ReadBufferStripe<T>]>,
    #[cfg(feature = "concurrent")]
    drain_lock: parking_lot::Mutex<()>,
}

impl<T> ReadBuffer<T> {
    /// Creates a buffer with [`READ_BUFFER_COUNT`] empty stripes.
    pub fn new() -> Self {
        let stripes: Vec<ReadBufferStripe<T>> = (0..READ_BUFFER_COUNT)
            .map(|_| ReadBufferStripe::new())
            .collect();
        Self {
            stripes: stripes.into_boxed_slice(),
            #[cfg(feature = "concurrent")]
            drain_lock: parking_lot::Mutex::new(()),
        }
    }

    /// Returns the stripe selected by `hint`.
    ///
    /// The hint spreads producers across lanes; callers typically derive it
    /// from the current thread so that threads contend on different stripes.
    pub fn stripe(&self, hint: usize) -> &ReadBufferStripe<T> {
        &self.stripes[hint & STRIPE_MASK]
    }

    /// Publishes a read event into the stripe selected by `hint`.
    pub fn record(&self, hint: usize, node: *mut T) -> RecordStatus {
        self.stripe(hint).record(node)
    }

    /// Publishes a read event into the stripe for the current thread.
    #[cfg(feature = "std")]
    pub fn record_current(&self, node: *mut T) -> RecordStatus {
        self.record(thread_hint(), node)
    }

    /// Sum of pending events across all stripes, as last observed.
    pub fn pending(&self) -> u64 {
        self.stripes.iter().map(ReadBufferStripe::pending).sum()
    }

    /// Drains every stripe in order, invoking `f` for each recorded event.
    ///
    /// Contract: at most one consumer over the whole buffer at any instant.
    /// Returns the number of events consumed.
    pub fn drain<F: FnMut(*mut T)>(&self, mut f: F) -> usize {
        let mut drained = 0;
        for stripe in self.stripes.iter() {
            drained += stripe.drain(&mut f);
        }
        drained
    }

    /// Drains the buffer if no other consumer holds the maintenance guard.
    ///
    /// Returns `None` without blocking when another drain is in progress,
    /// making the single-consumer contract enforceable at runtime.
    #[cfg(feature = "concurrent")]
    pub fn try_drain<F: FnMut(*mut T)>(&self, f: F) -> Option<usize> {
        let _guard = self.drain_lock.try_lock()?;
        Some(self.drain(f))
    }
}

impl<T> Default for ReadBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for ReadBuffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReadBuffer")
            .field("stripes", &self.stripes.len())
            .field("pending", &self.pending())
            .finish()
    }
}

impl<T> core::fmt::Debug for ReadBufferStripe<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReadBufferStripe")
            .field("write_count", &self.write_count())
            .field("read_count", &self.read_count())
            .finish()
    }
}

/// Hashes the current thread's id into a stripe hint.
#[cfg(feature = "std")]
fn thread_hint() -> usize {
    use core::hash::{Hash, Hasher};
    use std::collections::hash_map::DefaultHasher;

    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish() as usize
}

#[cfg(feature = "std")]
extern crate std;

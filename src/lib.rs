#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       VariantRegistry                          │
//! │   FeatureSet ──▶ chain of GenerationSpec layers (memoized)     │
//! └──────────────────────────────┬─────────────────────────────────┘
//!                                │ per layer
//!                                ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       VariantComposer                          │
//! │   ordered feature handlers, first-true-transition gating       │
//! └──────────────────────────────┬─────────────────────────────────┘
//!                                │ drives
//!                                ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │          Emitter (trait) / VariantSchema (recorder)            │
//! │   fields · constructor statements · accessors                  │
//! └────────────────────────────────────────────────────────────────┘
//!
//!         runtime primitives referenced by emitted schemas:
//!   RelaxedCounter · RelaxedRef · ReadBuffer (striped, lossy)
//! ```
//!
//! # Module Overview
//!
//! - [`feature`]: capability vocabulary, `FeatureSet`, derived predicates
//! - [`spec`]: validated per-layer generation requests
//! - [`composer`]: the incremental-delta composition walk
//! - [`emit`]: the emission contract and the recording schema
//! - [`registry`]: memoized variant chains
//! - [`relaxed`]: relaxed counter and reference cells
//! - [`read_buffer`]: the striped lock-free read-event buffer
//! - [`weigher`], [`stats`], [`ticker`]: pluggable strategy collaborators

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Cache capability vocabulary.
///
/// Defines the closed `Feature` enum, the `FeatureSet` collection, the
/// derived infrastructure predicates, and canonical name conversion.
pub mod feature;

/// Variant generation requests.
///
/// Provides the validated `GenerationSpec` for one chain layer and the
/// `SpecError` taxonomy for malformed capability requests.
pub mod spec;

/// Emission contract.
///
/// Defines the `Emitter` trait the composer drives, the field, constructor,
/// and accessor declaration types, and the recording `VariantSchema`.
pub mod emit;

/// Variant composer.
///
/// Walks the ordered feature handlers for one layer and emits exactly the
/// incremental state the layer needs, allocating predicate-gated
/// infrastructure at the first true transition in the chain.
pub mod composer;

/// Memoized variant registry.
///
/// Decomposes requested feature sets into canonical chains and reuses
/// already-generated ancestors across requests.
pub mod registry;

/// Relaxed atomic cells.
///
/// A single-writer relaxed `u64` counter and a relaxed reference slot with
/// an acquire-release compare-and-swap; the lock-free building blocks of
/// every bounded variant.
pub mod relaxed;

/// Striped lossy read buffer.
///
/// Records read events from many producers across independent stripes for
/// a single maintenance consumer to drain.
pub mod read_buffer;

/// Entry weighing strategies.
///
/// The `Weigher` trait, a unit weigher, and a bound-enforcing wrapper.
pub mod weigher;

/// Statistics recording strategies.
///
/// The `StatsCounter` trait, a disabled no-op counter, and a relaxed
/// concurrent counter.
pub mod stats;

/// Time source strategy.
///
/// The `Ticker` trait with disabled and system-clock implementations.
pub mod ticker;

// Re-export the composition surface
pub use composer::VariantComposer;
pub use emit::{Emitter, VariantSchema};
pub use feature::{Feature, FeatureSet};
pub use registry::VariantRegistry;
pub use spec::{GenerationSpec, SpecError};

// Re-export the runtime primitives
pub use read_buffer::{ReadBuffer, ReadBufferStripe, RecordStatus};
pub use relaxed::{RelaxedCounter, RelaxedRef};

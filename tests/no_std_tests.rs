//! no_std Compatibility Tests
//!
//! Exercises the composition surface and the runtime primitives through
//! `core` and `alloc` only, so a regression that sneaks a `std` dependency
//! into the library fails here.

#![no_std]
extern crate alloc;
extern crate cache_compose;

use alloc::vec::Vec;
use cache_compose::read_buffer::{ReadBuffer, RecordStatus};
use cache_compose::{Feature, FeatureSet, GenerationSpec, VariantComposer, VariantRegistry};
use cache_compose::emit::VariantSchema;
use cache_compose::relaxed::{RelaxedCounter, RelaxedRef};

#[test]
fn chains_resolve_without_std() {
    let mut registry = VariantRegistry::new();
    let chain = registry
        .chain(FeatureSet::of(&[
            Feature::WeakKeys,
            Feature::MaximumWeight,
            Feature::Stats,
        ]))
        .unwrap();
    assert_eq!(
        chain,
        ["WeakKeys", "WeakKeysMaximumWeight", "WeakKeysMaximumWeightStats"]
    );
}

#[test]
fn composition_runs_without_std() {
    let spec = GenerationSpec::new(
        FeatureSet::EMPTY,
        FeatureSet::of(&[Feature::MaximumWeight]),
    )
    .unwrap();
    let mut schema = VariantSchema::new(spec.variant_name());
    VariantComposer::compose(&spec, &mut schema);
    assert!(schema.has_field("maximum"));
    assert!(schema.has_field("weigher"));
    assert!(schema.has_accessor("is_weighted"));
}

#[test]
fn relaxed_cells_work_without_std() {
    let counter = RelaxedCounter::new(1);
    counter.store(2);
    assert_eq!(counter.load(), 2);

    let mut value = 3u64;
    let cell: RelaxedRef<u64> = RelaxedRef::new();
    assert!(cell.compare_and_swap(core::ptr::null_mut(), &mut value));
    assert!(!cell.is_empty());
}

#[test]
fn read_buffer_works_without_std() {
    let buffer: ReadBuffer<u64> = ReadBuffer::new();
    let mut nodes: Vec<u64> = (0..8).collect();
    for (hint, node) in nodes.iter_mut().enumerate() {
        assert_eq!(buffer.record(hint, node), RecordStatus::Recorded);
    }
    let mut drained = 0;
    buffer.drain(|_| drained += 1);
    assert_eq!(drained, 8);
    assert_eq!(buffer.pending(), 0);
}

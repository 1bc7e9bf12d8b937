//! Variant Composer
//!
//! Walks an ordered list of feature handlers for one layer of a variant
//! chain and instructs the [`Emitter`] to add exactly the incremental state
//! the layer needs. Handlers fall into two groups:
//!
//! - **Presence-gated**: triggered by a feature in the generate delta alone
//!   (reference queues, loader, listener, executor, stats, weigher,
//!   durations). The delta is disjoint from the parent by construction, so
//!   these can never be re-emitted.
//! - **Predicate-gated**: shared infrastructure (ticker, maximum counters,
//!   ordering deques, write queue, read buffer) is emitted under the
//!   first-true-transition rule: at the one layer where the gating predicate
//!   flips from false on the parent set to true on the *effective* set.
//!   Every layer deeper in the chain sees the predicate already true on its
//!   parent set and stays silent, so each item is allocated exactly once
//!   across the whole chain.
//!
//! Handler order is fixed. It only matters where one handler's output is a
//! prerequisite for another's (counters before the read-buffer wiring that
//! indexes by them), but keeping the full order fixed also makes the
//! emission stream deterministic for reproducible output.
//!
//! # Examples
//!
//! ```
//! use cache_compose::composer::VariantComposer;
//! use cache_compose::emit::VariantSchema;
//! use cache_compose::feature::{Feature, FeatureSet};
//! use cache_compose::spec::GenerationSpec;
//!
//! let spec = GenerationSpec::new(
//!     FeatureSet::EMPTY,
//!     FeatureSet::of(&[Feature::MaximumSize]),
//! )
//! .unwrap();
//! let mut schema = VariantSchema::new(spec.variant_name());
//! VariantComposer::compose(&spec, &mut schema);
//!
//! assert!(schema.has_field("maximum"));
//! assert!(schema.has_field("read_buffers"));
//! assert!(!schema.has_field("ticker"));
//! ```

use crate::emit::{AccessorBody, AccessorDecl, CtorStatement, Emitter, FieldDecl, FieldKind, InitExpr};
use crate::feature::{Feature, FeatureSet};
use crate::spec::GenerationSpec;

/// Composes the incremental declarations for one chain layer.
pub struct VariantComposer<'a, E: Emitter> {
    parent: FeatureSet,
    generate: FeatureSet,
    effective: FeatureSet,
    emitter: &'a mut E,
}

impl<'a, E: Emitter> VariantComposer<'a, E> {
    /// Emits the layer described by `spec` into `emitter`.
    ///
    /// Infallible: the spec's invariants were validated at construction and
    /// composition is a pure in-memory walk.
    pub fn compose(spec: &GenerationSpec, emitter: &'a mut E) {
        let mut composer = VariantComposer {
            parent: spec.parent(),
            generate: spec.generate(),
            effective: spec.effective(),
            emitter,
        };
        composer.add_key_strength();
        composer.add_value_strength();
        composer.add_cache_loader();
        composer.add_removal_listener();
        composer.add_executor();
        composer.add_stats();
        composer.add_ticker();
        composer.add_maximum();
        composer.add_weigher();
        composer.add_access_order_deque();
        composer.add_expire_after_access();
        composer.add_expire_after_write();
        composer.add_refresh_after_write();
        composer.add_write_order_deque();
        composer.add_write_queue();
        composer.add_read_buffer();
    }

    /// True at the one layer where `predicate` flips from false on the
    /// parent set to true on the effective set.
    ///
    /// The effective set is used deliberately: with a disjoint delta and
    /// monotone predicates the check is equivalent to testing the delta, but
    /// evaluating the union keeps the rule correct even for a predicate over
    /// multiple features split across parent and delta.
    fn first_transition(&self, predicate: fn(FeatureSet) -> bool) -> bool {
        !predicate(self.parent) && predicate(self.effective)
    }

    fn add_key_strength(&mut self) {
        if self.generate.contains(Feature::WeakKeys) {
            self.add_strength(
                "key_reference_queue",
                FieldKind::KeyReferenceQueue,
                "collect_keys",
            );
        }
    }

    fn add_value_strength(&mut self) {
        if self.generate.contains(Feature::InfirmValues) {
            self.add_strength(
                "value_reference_queue",
                FieldKind::ValueReferenceQueue,
                "collect_values",
            );
        }
    }

    /// Reference-strength state for one side. The key and value sides are
    /// independent instances and never share storage.
    fn add_strength(&mut self, queue: &'static str, kind: FieldKind, collect: &'static str) {
        self.emitter.add_field(FieldDecl {
            name: queue,
            kind,
            mutable: false,
        });
        self.emitter.add_constructor(CtorStatement {
            field: queue,
            init: InitExpr::EmptyCollection,
        });
        self.emitter.add_accessor(AccessorDecl {
            name: queue,
            body: AccessorBody::ReturnField(queue),
        });
        self.emitter.add_accessor(AccessorDecl {
            name: collect,
            body: AccessorBody::ReturnTrue,
        });
    }

    fn add_cache_loader(&mut self) {
        if !self.generate.contains(Feature::Loading) {
            return;
        }
        self.add_strategy("cache_loader", FieldKind::CacheLoader, None);
    }

    fn add_removal_listener(&mut self) {
        if !self.generate.contains(Feature::Listening) {
            return;
        }
        self.add_strategy(
            "removal_listener",
            FieldKind::RemovalListener,
            Some("has_removal_listener"),
        );
    }

    fn add_executor(&mut self) {
        if !self.generate.contains(Feature::Executor) {
            return;
        }
        self.add_strategy("executor", FieldKind::Executor, None);
    }

    fn add_stats(&mut self) {
        if !self.generate.contains(Feature::Stats) {
            return;
        }
        self.add_strategy(
            "stats_counter",
            FieldKind::StatsCounter,
            Some("is_recording_stats"),
        );
    }

    /// An externally supplied strategy object: one field copied out of the
    /// builder, a read accessor, and an optional capability flag.
    fn add_strategy(&mut self, name: &'static str, kind: FieldKind, flag: Option<&'static str>) {
        self.emitter.add_field(FieldDecl {
            name,
            kind,
            mutable: false,
        });
        self.emitter.add_constructor(CtorStatement {
            field: name,
            init: InitExpr::FromBuilder,
        });
        self.emitter.add_accessor(AccessorDecl {
            name,
            body: AccessorBody::ReturnField(name),
        });
        if let Some(flag) = flag {
            self.emitter.add_accessor(AccessorDecl {
                name: flag,
                body: AccessorBody::ReturnTrue,
            });
        }
    }

    fn add_ticker(&mut self) {
        if !self.first_transition(FeatureSet::uses_ticker) {
            return;
        }
        self.add_strategy("ticker", FieldKind::Ticker, None);
    }

    fn add_maximum(&mut self) {
        if !self.first_transition(FeatureSet::uses_maximum) {
            return;
        }
        self.emitter.add_accessor(AccessorDecl {
            name: "evicts",
            body: AccessorBody::ReturnTrue,
        });

        // Two independent single-writer counters: the administrator-set
        // ceiling and the running weight total. Written only by the
        // maintenance path, read with relaxed semantics by any thread.
        self.add_counter("maximum", "set_maximum", InitExpr::ClampedCapacity);
        self.add_counter("weighted_size", "set_weighted_size", InitExpr::Zero);
    }

    fn add_counter(&mut self, name: &'static str, setter: &'static str, init: InitExpr) {
        self.emitter.add_field(FieldDecl {
            name,
            kind: FieldKind::CounterCell,
            mutable: true,
        });
        self.emitter.add_constructor(CtorStatement { field: name, init });
        self.emitter.add_accessor(AccessorDecl {
            name,
            body: AccessorBody::ReturnField(name),
        });
        self.emitter.add_accessor(AccessorDecl {
            name: setter,
            body: AccessorBody::SetField(name),
        });
    }

    fn add_weigher(&mut self) {
        if !self.generate.contains(Feature::MaximumWeight) {
            return;
        }
        self.add_strategy("weigher", FieldKind::Weigher, Some("is_weighted"));
    }

    fn add_access_order_deque(&mut self) {
        if !self.first_transition(FeatureSet::uses_access_order_deque) {
            return;
        }
        self.add_sequence("access_order_deque", FieldKind::AccessOrderDeque, None);
    }

    fn add_write_order_deque(&mut self) {
        if !self.first_transition(FeatureSet::uses_write_order_deque) {
            return;
        }
        self.add_sequence("write_order_deque", FieldKind::WriteOrderDeque, None);
    }

    fn add_write_queue(&mut self) {
        if !self.first_transition(FeatureSet::uses_write_queue) {
            return;
        }
        self.add_sequence("write_queue", FieldKind::WriteQueue, Some("buffers_writes"));
    }

    fn add_sequence(&mut self, name: &'static str, kind: FieldKind, flag: Option<&'static str>) {
        self.emitter.add_field(FieldDecl {
            name,
            kind,
            mutable: false,
        });
        self.emitter.add_constructor(CtorStatement {
            field: name,
            init: InitExpr::EmptyCollection,
        });
        self.emitter.add_accessor(AccessorDecl {
            name,
            body: AccessorBody::ReturnField(name),
        });
        if let Some(flag) = flag {
            self.emitter.add_accessor(AccessorDecl {
                name: flag,
                body: AccessorBody::ReturnTrue,
            });
        }
    }

    fn add_expire_after_access(&mut self) {
        if !self.generate.contains(Feature::ExpireAccess) {
            return;
        }
        self.add_duration(
            "expires_after_access_nanos",
            "set_expires_after_access_nanos",
            "expires_after_access",
        );
    }

    fn add_expire_after_write(&mut self) {
        if !self.generate.contains(Feature::ExpireWrite) {
            return;
        }
        self.add_duration(
            "expires_after_write_nanos",
            "set_expires_after_write_nanos",
            "expires_after_write",
        );
    }

    fn add_refresh_after_write(&mut self) {
        if !self.generate.contains(Feature::RefreshWrite) {
            return;
        }
        self.add_duration(
            "refresh_after_write_nanos",
            "set_refresh_after_write_nanos",
            "refresh_after_write",
        );
    }

    /// A nanosecond duration: the only state both constructor-initialized
    /// and settable afterwards, so the field is a mutable relaxed cell and a
    /// setter is emitted alongside the flag and the read accessor.
    fn add_duration(&mut self, name: &'static str, setter: &'static str, flag: &'static str) {
        self.emitter.add_field(FieldDecl {
            name,
            kind: FieldKind::DurationCell,
            mutable: true,
        });
        self.emitter.add_constructor(CtorStatement {
            field: name,
            init: InitExpr::FromBuilder,
        });
        self.emitter.add_accessor(AccessorDecl {
            name: flag,
            body: AccessorBody::ReturnTrue,
        });
        self.emitter.add_accessor(AccessorDecl {
            name,
            body: AccessorBody::ReturnField(name),
        });
        self.emitter.add_accessor(AccessorDecl {
            name: setter,
            body: AccessorBody::SetField(name),
        });
    }

    fn add_read_buffer(&mut self) {
        if !self.first_transition(FeatureSet::needs_read_buffer) {
            return;
        }
        self.emitter.add_field(FieldDecl {
            name: "read_buffers",
            kind: FieldKind::ReadBufferSlots,
            mutable: false,
        });
        self.emitter.add_constructor(CtorStatement {
            field: "read_buffers",
            init: InitExpr::StripedBuffer,
        });
        self.emitter.add_accessor(AccessorDecl {
            name: "read_buffers",
            body: AccessorBody::ReturnField("read_buffers"),
        });

        self.emitter.add_field(FieldDecl {
            name: "read_buffer_write_count",
            kind: FieldKind::ReadBufferCounters,
            mutable: false,
        });
        self.emitter.add_constructor(CtorStatement {
            field: "read_buffer_write_count",
            init: InitExpr::StripedBuffer,
        });
        self.emitter.add_accessor(AccessorDecl {
            name: "read_buffer_write_count",
            body: AccessorBody::ReturnField("read_buffer_write_count"),
        });

        self.emitter.add_field(FieldDecl {
            name: "read_buffer_read_count",
            kind: FieldKind::ReadBufferCounters,
            mutable: false,
        });
        self.emitter.add_constructor(CtorStatement {
            field: "read_buffer_read_count",
            init: InitExpr::StripedBuffer,
        });
        self.emitter.add_accessor(AccessorDecl {
            name: "read_buffer_read_count",
            body: AccessorBody::ReturnField("read_buffer_read_count"),
        });
    }
}

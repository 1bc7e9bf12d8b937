//! Emission Contract
//!
//! The composer does not produce output artifacts itself; it drives an
//! [`Emitter`] through a generic field / constructor-statement / accessor
//! API and leaves the rendering to the implementation. The declarations are
//! plain data so an emitter may turn them into generated source, a runtime
//! struct layout, or anything else that can represent a variant.
//!
//! Two guarantees matter to emitter implementations:
//!
//! - **Determinism**: for identical input specs the composer calls the
//!   emitter with an identical sequence of declarations, so output is
//!   reproducible. (The same reasoning the metrics reporters use for
//!   ordered map output applies here: deterministic order is worth far more
//!   than micro-optimization of the emission path.)
//! - **At-most-once infrastructure**: declarations gated by a derived
//!   predicate arrive at exactly one layer of an inheritance chain.
//!
//! [`VariantSchema`] is the recording emitter used by the registry and the
//! test-suite: it stores the declaration stream verbatim and offers lookup
//! helpers.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// The storage category of an emitted field.
///
/// A rendering emitter maps each kind onto a concrete type; a runtime
/// emitter maps it onto a component slot. The counter and duration kinds are
/// backed by [`RelaxedCounter`](crate::relaxed::RelaxedCounter) cells, the
/// read-buffer kinds by [`RelaxedRef`](crate::relaxed::RelaxedRef) slot
/// arrays and counter stripes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Reference queue collecting reclaimed keys.
    KeyReferenceQueue,
    /// Reference queue collecting reclaimed values.
    ValueReferenceQueue,
    /// Removal-notification sink supplied by the caller.
    RemovalListener,
    /// Task-submission strategy supplied by the caller.
    Executor,
    /// Value loader supplied by the caller.
    CacheLoader,
    /// Statistics-recording strategy supplied by the caller.
    StatsCounter,
    /// Time source supplied by the caller.
    Ticker,
    /// A single-writer relaxed `u64` counter cell.
    CounterCell,
    /// Weight function supplied by the caller.
    Weigher,
    /// Insertion-ordered access sequence of cache entries.
    AccessOrderDeque,
    /// Insertion-ordered write sequence of cache entries.
    WriteOrderDeque,
    /// Buffer of pending write events for the maintenance path.
    WriteQueue,
    /// Striped array of relaxed reference slots recording read events.
    ReadBufferSlots,
    /// Per-stripe relaxed counter array (one counter per stripe).
    ReadBufferCounters,
    /// A mutable nanosecond duration held in a relaxed cell.
    DurationCell,
}

/// A field declaration paired with its storage category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name, unique within a variant chain.
    pub name: &'static str,
    /// Storage category.
    pub kind: FieldKind,
    /// Whether the field is written after construction. Immutable fields may
    /// be rendered as plain finals; mutable ones need a relaxed cell.
    pub mutable: bool,
}

/// The initial-value expression of a constructor statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitExpr {
    /// Copy the externally supplied strategy or setting out of the builder.
    FromBuilder,
    /// The requested capacity ceiling clamped to
    /// [`MAXIMUM_CAPACITY`](crate::weigher::MAXIMUM_CAPACITY).
    ClampedCapacity,
    /// A counter starting at zero.
    Zero,
    /// A freshly allocated empty collection.
    EmptyCollection,
    /// [`READ_BUFFER_COUNT`](crate::read_buffer::READ_BUFFER_COUNT) stripes
    /// of empty cells, each stripe holding
    /// [`READ_BUFFER_SIZE`](crate::read_buffer::READ_BUFFER_SIZE) slots or
    /// one counter per stripe.
    StripedBuffer,
}

/// One constructor statement: initialize `field` with `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtorStatement {
    /// Field to initialize.
    pub field: &'static str,
    /// Initial-value expression.
    pub init: InitExpr,
}

/// The body of an emitted accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorBody {
    /// Read accessor returning the named field.
    ReturnField(&'static str),
    /// Capability flag fixed to `true` once the feature is present.
    ReturnTrue,
    /// Setter storing its argument into the named field.
    SetField(&'static str),
}

/// An accessor declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorDecl {
    /// Accessor name.
    pub name: &'static str,
    /// Accessor body.
    pub body: AccessorBody,
}

/// Receives the composer's decisions for one variant, in emission order.
///
/// Implementations must not reorder or deduplicate; the composer already
/// guarantees that nothing arrives twice across an inheritance chain.
pub trait Emitter {
    /// Adds a field declaration.
    fn add_field(&mut self, field: FieldDecl);

    /// Adds a constructor statement.
    fn add_constructor(&mut self, statement: CtorStatement);

    /// Adds an accessor declaration.
    fn add_accessor(&mut self, accessor: AccessorDecl);
}

/// A recording [`Emitter`] that captures the declaration stream for one
/// variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSchema {
    name: String,
    fields: Vec<FieldDecl>,
    constructor: Vec<CtorStatement>,
    accessors: Vec<AccessorDecl>,
}

impl VariantSchema {
    /// Creates an empty schema for the named variant.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constructor: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// The variant name this schema belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emitted fields, in emission order.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Emitted constructor statements, in emission order.
    pub fn constructor(&self) -> &[CtorStatement] {
        &self.constructor
    }

    /// Emitted accessors, in emission order.
    pub fn accessors(&self) -> &[AccessorDecl] {
        &self.accessors
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if a field with the given name was emitted.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Looks up an accessor by name.
    pub fn accessor(&self, name: &str) -> Option<&AccessorDecl> {
        self.accessors.iter().find(|accessor| accessor.name == name)
    }

    /// Returns `true` if an accessor with the given name was emitted.
    pub fn has_accessor(&self, name: &str) -> bool {
        self.accessor(name).is_some()
    }
}

impl Emitter for VariantSchema {
    fn add_field(&mut self, field: FieldDecl) {
        self.fields.push(field);
    }

    fn add_constructor(&mut self, statement: CtorStatement) {
        self.constructor.push(statement);
    }

    fn add_accessor(&mut self, accessor: AccessorDecl) {
        self.accessors.push(accessor);
    }
}

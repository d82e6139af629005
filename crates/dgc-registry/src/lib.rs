//! Comparator registry for DGC (Deep Graph Comparison).
//!
//! The comparison engine delegates equality judgments to caller-supplied
//! comparators at two kinds of override points: a specific traversal path,
//! or any value of a given runtime type. This crate provides both lookup
//! structures plus the comparator trait they store.
//!
//! # Key Types
//!
//! - [`ValueComparator`] -- The pluggable equality/ordering predicate.
//! - [`TypeComparators`] -- Type-name keyed registry with supertype and
//!   interface resolution (nearest registered ancestor wins).
//! - [`FieldComparators`] -- Flat rendered-path keyed overrides, exact
//!   match only.
//! - [`stock`] -- Ready-made comparators: numeric equivalence,
//!   case-insensitive text, always-equal.
//!
//! A registry is built once per comparison configuration, stays immutable
//! during a run, and may be reused across runs (single writer, then many
//! readers; no internal locking).

pub mod comparator;
pub mod fields;
pub mod stock;
pub mod types;

pub use comparator::{ComparatorError, ValueComparator};
pub use fields::FieldComparators;
pub use stock::{AlwaysEqualComparator, CaseInsensitiveTextComparator, NumericComparator};
pub use types::TypeComparators;

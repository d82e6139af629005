//! Foundation types for DGC (Deep Graph Comparison).
//!
//! This crate provides the dynamic value model that the comparison engine
//! walks, plus the two capability surfaces the engine depends on: basic-type
//! classification and field introspection. Every other DGC crate depends on
//! `dgc-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- A dynamically typed value graph node. Composite variants are
//!   reference-counted so graphs can hold shared substructure and true
//!   reference cycles.
//! - [`ValueKind`] -- Classification of a value (scalar, array, list, set,
//!   map, object).
//! - [`TypeInfo`] -- Runtime type descriptor (name, class/interface kind,
//!   superclass, implemented interfaces) consumed by comparator resolution.
//! - [`FieldPath`] / [`PathSegment`] -- Dotted traversal paths such as
//!   `a.b[0]` or `prices.get("apple")`.
//! - [`FieldEnumerator`] -- The field-introspection trait; [`Record`] is the
//!   stock implementation.

pub mod fields;
pub mod json;
pub mod path;
pub mod type_info;
pub mod value;

pub use fields::{FieldAccessError, FieldEnumerator, Record};
pub use path::{FieldPath, PathSegment};
pub use type_info::{builtin, ClosureEntry, TypeInfo, TypeInfoBuilder, TypeKind};
pub use value::{ContainerOrdering, MapData, SetData, Value, ValueKind};

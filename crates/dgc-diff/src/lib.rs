//! Recursive difference engine for DGC (Deep Graph Comparison).
//!
//! Walks two value graphs in lock-step, comparing corresponding
//! fields/elements, detecting reference cycles, matching unordered
//! containers best-effort, and accumulating the list of structural
//! differences. An empty list means the graphs are deep-equal.
//!
//! # Key Types
//!
//! - [`determine_differences`] / [`determine_differences_with`] -- The
//!   comparison entry points.
//! - [`Difference`] / [`DifferenceReason`] -- One reported disagreement,
//!   tagged with its traversal path.
//! - [`deep_hash`] -- Cycle-safe deep hashing, consistent with default
//!   deep equality.
//! - [`ComparisonConfig`] -- Comparator overrides plus ignored paths.
//! - [`DiffError`] -- The fatal error taxonomy (throwing comparators,
//!   failing field access); structural mismatches are never errors.
//!
//! # Example
//!
//! ```
//! use dgc_diff::determine_differences;
//! use dgc_registry::{FieldComparators, TypeComparators};
//! use dgc_types::Value;
//!
//! let left = Value::from_json(&serde_json::json!({"a": 1, "b": [1, 2]}));
//! let right = Value::from_json(&serde_json::json!({"a": 1, "b": [1, 3]}));
//!
//! let differences = determine_differences(
//!     &left,
//!     &right,
//!     &FieldComparators::new(),
//!     &TypeComparators::new(),
//! )
//! .unwrap();
//! assert_eq!(differences.len(), 1);
//! assert_eq!(differences[0].path_string(), "get(\"b\")[1]");
//! ```

pub mod config;
pub mod difference;
pub mod engine;
pub mod error;
pub mod hash;

pub use config::ComparisonConfig;
pub use difference::{Difference, DifferenceReason, DifferenceReport};
pub use engine::{determine_differences, determine_differences_with};
pub use error::{DiffError, DiffResult};
pub use hash::deep_hash;

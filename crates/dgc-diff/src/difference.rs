//! Difference records.

use std::fmt;

use serde::{Deserialize, Serialize};

use dgc_types::{FieldPath, Value, ValueKind};

/// Why two values at one path were judged different.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DifferenceReason {
    /// Exactly one of the two values is null.
    NullMismatch,
    /// The values have incompatible kinds (scalar kind, container shape,
    /// or scalar vs container).
    TypeMismatch {
        left: ValueKind,
        right: ValueKind,
    },
    /// A sorted and an unsorted container met; they differ structurally
    /// regardless of content.
    OrderingMismatch,
    /// Arrays of unequal length.
    LengthMismatch { left: usize, right: usize },
    /// Collections or maps of unequal size.
    SizeMismatch { left: usize, right: usize },
    /// Unordered matching left elements without a deep-equal partner.
    UnmatchedElements {
        /// Number of left-side elements that found no match.
        count: usize,
    },
    /// The maps' key sets are not deep-equal as sets.
    KeySetMismatch,
    /// The objects declare different field-name sets.
    FieldSetMismatch,
    /// Scalar values of the same kind with unequal native values.
    ValueMismatch,
    /// A registered comparator reported the pair as different.
    ComparatorMismatch,
}

impl fmt::Display for DifferenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifferenceReason::NullMismatch => {
                write!(f, "one value is null and the other is not")
            }
            DifferenceReason::TypeMismatch { left, right } => {
                write!(f, "values have incompatible kinds ({left:?} vs {right:?})")
            }
            DifferenceReason::OrderingMismatch => {
                write!(f, "sorted and unsorted containers differ structurally")
            }
            DifferenceReason::LengthMismatch { left, right } => {
                write!(f, "array lengths differ ({left} vs {right})")
            }
            DifferenceReason::SizeMismatch { left, right } => {
                write!(f, "sizes differ ({left} vs {right})")
            }
            DifferenceReason::UnmatchedElements { count } => {
                write!(f, "{count} element(s) have no match in the other set")
            }
            DifferenceReason::KeySetMismatch => write!(f, "map key sets differ"),
            DifferenceReason::FieldSetMismatch => {
                write!(f, "objects declare different field sets")
            }
            DifferenceReason::ValueMismatch => write!(f, "values differ"),
            DifferenceReason::ComparatorMismatch => {
                write!(f, "custom comparator reported values as different")
            }
        }
    }
}

/// One structural disagreement between the compared graphs.
///
/// Differences are produced by the engine in traversal order and are
/// read-only to callers.
#[derive(Clone, Debug)]
pub struct Difference {
    /// Where in the graph the disagreement was found.
    pub path: FieldPath,
    /// The value from the left graph.
    pub left: Value,
    /// The value from the right graph.
    pub right: Value,
    /// Why the values were judged different.
    pub reason: DifferenceReason,
}

impl Difference {
    /// Create a new difference record.
    pub fn new(path: FieldPath, left: Value, right: Value, reason: DifferenceReason) -> Self {
        Self {
            path,
            left,
            right,
            reason,
        }
    }

    /// The rendered path string (empty for the comparison root).
    pub fn path_string(&self) -> String {
        self.path.render()
    }

    /// Render to a serializable report.
    pub fn report(&self) -> DifferenceReport {
        DifferenceReport {
            path: self.path_string(),
            left: self.left.render(),
            right: self.right.render(),
            reason: self.reason.to_string(),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "<top level>: ")?;
        } else {
            write!(f, "{}: ", self.path)?;
        }
        write!(
            f,
            "{} (left: {}, right: {})",
            self.reason, self.left, self.right
        )
    }
}

/// A rendered, serializable view of a [`Difference`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceReport {
    /// Rendered path.
    pub path: String,
    /// Rendered left value.
    pub left: String,
    /// Rendered right value.
    pub right: String,
    /// Human-readable reason.
    pub reason: String,
}

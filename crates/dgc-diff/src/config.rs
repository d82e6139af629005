//! Comparison configuration.

use std::collections::BTreeSet;

use dgc_registry::{FieldComparators, TypeComparators};

/// Everything that parameterizes one comparison run: comparator overrides
/// and ignored paths.
///
/// A configuration is built once, stays immutable during a run, and may be
/// reused across runs.
#[derive(Default)]
pub struct ComparisonConfig {
    /// Rendered-path keyed comparator overrides (take precedence over type
    /// comparators at the same recursion point).
    pub field_comparators: FieldComparators,
    /// Type-keyed comparator overrides with hierarchy resolution.
    pub type_comparators: TypeComparators,
    /// Rendered paths to skip entirely (exact match).
    pub ignored_paths: BTreeSet<String>,
}

impl ComparisonConfig {
    /// An empty configuration: purely structural comparison.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore the value pair at exactly this rendered path.
    pub fn ignore_path(&mut self, path: impl Into<String>) {
        self.ignored_paths.insert(path.into());
    }
}

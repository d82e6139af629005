//! Field-path keyed comparator overrides.

use std::collections::HashMap;
use std::rc::Rc;

use crate::comparator::ValueComparator;

/// Maps rendered traversal paths (`a.b[0]`, `set.o`) to comparators.
///
/// Lookup is an exact string match on the rendered path; there is no
/// hierarchy resolution. At a given recursion point a field-path match
/// takes precedence over any type match.
#[derive(Default)]
pub struct FieldComparators {
    by_path: HashMap<String, Rc<dyn ValueComparator>>,
}

impl FieldComparators {
    /// An empty override map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Register or replace the comparator for a rendered path. Last write
    /// wins.
    pub fn put(&mut self, path: impl Into<String>, comparator: Rc<dyn ValueComparator>) {
        self.by_path.insert(path.into(), comparator);
    }

    /// Look up the comparator registered for exactly this rendered path.
    pub fn get(&self, rendered_path: &str) -> Option<Rc<dyn ValueComparator>> {
        self.by_path.get(rendered_path).cloned()
    }

    /// Returns `true` if a comparator is registered for exactly this path.
    pub fn has_comparator_for_field(&self, rendered_path: &str) -> bool {
        self.by_path.contains_key(rendered_path)
    }
}

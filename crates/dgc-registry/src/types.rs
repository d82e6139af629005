//! Type-keyed comparator registration with hierarchy resolution.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use dgc_types::{ClosureEntry, TypeInfo, TypeKind};

use crate::comparator::ValueComparator;

struct Registered {
    comparator: Rc<dyn ValueComparator>,
    /// Position in registration order, used as the final resolution
    /// tie-breaker. Re-registering a name keeps its original position.
    order: usize,
}

/// Maps runtime types to comparators, resolving ancestor classes and
/// implemented interfaces when no exact match exists.
///
/// Resolution for a queried type walks its supertype closure and picks the
/// registered entry with the smallest traversal distance; at equal distance
/// a class match beats an interface match, and remaining ties go to the
/// earliest-registered entry. The closure of each type name is computed
/// once and cached.
///
/// Registration is keyed by type name. The registry assumes one hierarchy
/// per name (share `TypeInfo` descriptors rather than rebuilding divergent
/// ones) and single-writer-then-many-readers usage: build it, then hand it
/// to comparisons without further `put` calls.
#[derive(Default)]
pub struct TypeComparators {
    by_name: HashMap<String, Registered>,
    next_order: usize,
    closure_cache: RefCell<HashMap<String, Rc<Vec<ClosureEntry>>>>,
}

impl TypeComparators {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Register or replace the comparator for an exact type name. Last
    /// write wins; a replaced entry keeps its original registration
    /// position for tie-breaking.
    pub fn put(&mut self, type_name: impl Into<String>, comparator: Rc<dyn ValueComparator>) {
        let type_name = type_name.into();
        match self.by_name.get_mut(&type_name) {
            Some(entry) => entry.comparator = comparator,
            None => {
                let order = self.next_order;
                self.next_order += 1;
                self.by_name
                    .insert(type_name, Registered { comparator, order });
            }
        }
    }

    /// Resolve the comparator for a runtime type: exact name match first,
    /// then the nearest registered ancestor in the type's supertype
    /// closure. Returns `None` when no ancestor is registered.
    pub fn get(&self, type_info: &TypeInfo) -> Option<Rc<dyn ValueComparator>> {
        if let Some(entry) = self.by_name.get(type_info.name()) {
            return Some(entry.comparator.clone());
        }
        if self.by_name.is_empty() {
            return None;
        }

        let closure = self.closure_of(type_info);
        let best = closure
            .iter()
            .filter_map(|ancestor| {
                self.by_name
                    .get(&ancestor.name)
                    .map(|entry| (ancestor, entry))
            })
            .min_by_key(|(ancestor, entry)| {
                let kind_rank = match ancestor.kind {
                    TypeKind::Class => 0u8,
                    TypeKind::Interface => 1u8,
                };
                (ancestor.distance, kind_rank, entry.order)
            });

        best.map(|(ancestor, entry)| {
            debug!(
                queried = type_info.name(),
                matched = ancestor.name.as_str(),
                distance = ancestor.distance,
                "resolved type comparator through hierarchy"
            );
            entry.comparator.clone()
        })
    }

    /// Returns `true` if [`get`](Self::get) would find a comparator. Has no
    /// observable side effects (the closure cache is a pure cache).
    pub fn has_comparator_for_type(&self, type_info: &TypeInfo) -> bool {
        self.get(type_info).is_some()
    }

    fn closure_of(&self, type_info: &TypeInfo) -> Rc<Vec<ClosureEntry>> {
        if let Some(cached) = self.closure_cache.borrow().get(type_info.name()) {
            return cached.clone();
        }
        let closure = Rc::new(type_info.closure());
        self.closure_cache
            .borrow_mut()
            .insert(type_info.name().to_string(), closure.clone());
        closure
    }
}

//! The recursive difference engine.
//!
//! Two value graphs are walked in lock-step over an explicit work deque
//! (children are pushed in reverse so siblings surface in declaration
//! order), with a visited-pair set keyed on composite identity providing
//! cycle termination. Comparator overrides are consulted at every
//! recursion point: a field-path entry for the rendered path wins over a
//! type entry for the left value's runtime type.
//!
//! Unordered containers are matched best-effort: left elements, in
//! iteration order, probe the remaining right candidates, in iteration
//! order, and consume the first deep-equal match. Probes are full
//! sub-comparisons that seed their visited set with a copy of the
//! enclosing one, so self-containing containers terminate without a failed
//! probe poisoning later pairs.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::{debug, trace};

use dgc_registry::{FieldComparators, TypeComparators};
use dgc_types::{FieldPath, Value};

use crate::config::ComparisonConfig;
use crate::difference::{Difference, DifferenceReason};
use crate::error::{DiffError, DiffResult};

/// One pair of corresponding values awaiting comparison.
struct DualKey {
    path: FieldPath,
    left: Value,
    right: Value,
}

/// Borrowed view of a comparison configuration.
struct Context<'a> {
    fields: &'a FieldComparators,
    types: &'a TypeComparators,
    ignored: &'a BTreeSet<String>,
}

/// Compare two value graphs and return every structural difference, in
/// traversal order. An empty list means the graphs are deep-equal.
///
/// Structural mismatches never fail; the only errors are a throwing
/// comparator or a failing field access, both of which abort the run with
/// no partial result.
pub fn determine_differences(
    left: &Value,
    right: &Value,
    field_comparators: &FieldComparators,
    type_comparators: &TypeComparators,
) -> DiffResult<Vec<Difference>> {
    let ignored = BTreeSet::new();
    let ctx = Context {
        fields: field_comparators,
        types: type_comparators,
        ignored: &ignored,
    };
    let differences = compare(&ctx, left, right, FieldPath::root(), &HashSet::new())?;
    debug!(count = differences.len(), "deep comparison finished");
    Ok(differences)
}

/// [`determine_differences`] with a full [`ComparisonConfig`], including
/// ignored paths.
pub fn determine_differences_with(
    left: &Value,
    right: &Value,
    config: &ComparisonConfig,
) -> DiffResult<Vec<Difference>> {
    let ctx = Context {
        fields: &config.field_comparators,
        types: &config.type_comparators,
        ignored: &config.ignored_paths,
    };
    let differences = compare(&ctx, left, right, FieldPath::root(), &HashSet::new())?;
    debug!(count = differences.len(), "deep comparison finished");
    Ok(differences)
}

fn compare(
    ctx: &Context<'_>,
    left: &Value,
    right: &Value,
    base_path: FieldPath,
    seed_visited: &HashSet<(usize, usize)>,
) -> DiffResult<Vec<Difference>> {
    let mut visited = seed_visited.clone();
    let mut work: VecDeque<DualKey> = VecDeque::new();
    work.push_back(DualKey {
        path: base_path,
        left: left.clone(),
        right: right.clone(),
    });
    let mut differences = Vec::new();

    while let Some(dual) = work.pop_front() {
        let rendered_path = dual.path.render();
        if ctx.ignored.contains(&rendered_path) {
            continue;
        }

        // The same composite node on both sides compares equal without
        // recursion; this also covers self-reference and shared
        // substructure.
        if dual.left.same_reference(&dual.right) {
            continue;
        }

        match (&dual.left, &dual.right) {
            (Value::Null, Value::Null) => continue,
            (Value::Null, _) | (_, Value::Null) => {
                record(&mut differences, &dual, DifferenceReason::NullMismatch);
                continue;
            }
            _ => {}
        }

        // A pair already on this traversal is assumed equal; the pair stays
        // visited for the rest of the run, which is what breaks cycles.
        if let (Some(a), Some(b)) = (dual.left.identity(), dual.right.identity()) {
            if !visited.insert((a, b)) {
                continue;
            }
        }

        // Comparator overrides replace structural comparison entirely.
        let override_comparator = ctx.fields.get(&rendered_path).or_else(|| {
            let type_info = dual.left.type_info();
            ctx.types.get(&type_info)
        });
        if let Some(comparator) = override_comparator {
            match comparator.compare(&dual.left, &dual.right) {
                Ok(Ordering::Equal) => {}
                Ok(_) => record(&mut differences, &dual, DifferenceReason::ComparatorMismatch),
                Err(source) => {
                    return Err(DiffError::Comparator {
                        path: rendered_path,
                        source,
                    })
                }
            }
            continue;
        }

        match (&dual.left, &dual.right) {
            (Value::Array(a), Value::Array(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    record(
                        &mut differences,
                        &dual,
                        DifferenceReason::LengthMismatch {
                            left: a.len(),
                            right: b.len(),
                        },
                    );
                    continue;
                }
                for i in (0..a.len()).rev() {
                    work.push_front(DualKey {
                        path: dual.path.index(i),
                        left: a[i].clone(),
                        right: b[i].clone(),
                    });
                }
            }

            (Value::List(a), Value::List(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    record(
                        &mut differences,
                        &dual,
                        DifferenceReason::SizeMismatch {
                            left: a.len(),
                            right: b.len(),
                        },
                    );
                    continue;
                }
                for i in (0..a.len()).rev() {
                    work.push_front(DualKey {
                        path: dual.path.index(i),
                        left: a[i].clone(),
                        right: b[i].clone(),
                    });
                }
            }

            (Value::Set(a), Value::Set(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                if a.ordering != b.ordering {
                    record(&mut differences, &dual, DifferenceReason::OrderingMismatch);
                    continue;
                }
                if a.elements.len() != b.elements.len() {
                    record(
                        &mut differences,
                        &dual,
                        DifferenceReason::SizeMismatch {
                            left: a.elements.len(),
                            right: b.elements.len(),
                        },
                    );
                    continue;
                }
                if a.ordering == dgc_types::ContainerOrdering::Sorted {
                    // Sorted sets iterate canonically, so they compare
                    // positionally. Position carries no meaning for set
                    // elements, so they keep the container's path.
                    for i in (0..a.elements.len()).rev() {
                        work.push_front(DualKey {
                            path: dual.path.clone(),
                            left: a.elements[i].clone(),
                            right: b.elements[i].clone(),
                        });
                    }
                } else {
                    let unmatched =
                        match_unordered(ctx, &a.elements, &b.elements, &dual.path, &visited)?;
                    if unmatched > 0 {
                        record(
                            &mut differences,
                            &dual,
                            DifferenceReason::UnmatchedElements { count: unmatched },
                        );
                    }
                }
            }

            (Value::Map(a), Value::Map(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                if a.ordering != b.ordering {
                    record(&mut differences, &dual, DifferenceReason::OrderingMismatch);
                    continue;
                }
                if a.entries.len() != b.entries.len() {
                    record(
                        &mut differences,
                        &dual,
                        DifferenceReason::SizeMismatch {
                            left: a.entries.len(),
                            right: b.entries.len(),
                        },
                    );
                    continue;
                }
                if a.ordering == dgc_types::ContainerOrdering::Sorted {
                    // Sorted maps compare entries positionally: keys at the
                    // map's path, values under `.get(key)`.
                    for i in (0..a.entries.len()).rev() {
                        let (left_key, left_value) = &a.entries[i];
                        let (right_key, right_value) = &b.entries[i];
                        work.push_front(DualKey {
                            path: dual.path.key(left_key.render()),
                            left: left_value.clone(),
                            right: right_value.clone(),
                        });
                        work.push_front(DualKey {
                            path: dual.path.clone(),
                            left: left_key.clone(),
                            right: right_key.clone(),
                        });
                    }
                } else {
                    match match_keys(ctx, &a.entries, &b.entries, &dual.path, &visited)? {
                        None => {
                            record(&mut differences, &dual, DifferenceReason::KeySetMismatch);
                        }
                        Some(matched) => {
                            for (left_key, left_value, right_value) in matched.into_iter().rev() {
                                work.push_front(DualKey {
                                    path: dual.path.key(left_key.render()),
                                    left: left_value,
                                    right: right_value,
                                });
                            }
                        }
                    }
                }
            }

            (Value::Object(left_obj), Value::Object(right_obj)) => {
                let left_names = left_obj.field_names();
                let right_names = right_obj.field_names();
                let left_set: HashSet<&String> = left_names.iter().collect();
                let right_set: HashSet<&String> = right_names.iter().collect();
                if left_set != right_set {
                    record(&mut differences, &dual, DifferenceReason::FieldSetMismatch);
                    continue;
                }
                for name in left_names.iter().rev() {
                    work.push_front(DualKey {
                        path: dual.path.field(name),
                        left: left_obj.field(name)?,
                        right: right_obj.field(name)?,
                    });
                }
            }

            (left_value, right_value) => match scalar_eq(left_value, right_value) {
                Some(true) => {}
                Some(false) => {
                    record(&mut differences, &dual, DifferenceReason::ValueMismatch);
                }
                None => {
                    record(
                        &mut differences,
                        &dual,
                        DifferenceReason::TypeMismatch {
                            left: left_value.kind(),
                            right: right_value.kind(),
                        },
                    );
                }
            },
        }
    }

    Ok(differences)
}

/// Native equality for scalar pairs of the same kind. `None` means the
/// pair is not two scalars of one kind.
fn scalar_eq(a: &Value, b: &Value) -> Option<bool> {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Some(x == y),
        (Value::Int(x), Value::Int(y)) => Some(x == y),
        (Value::Float(x), Value::Float(y)) => Some(x == y || (x.is_nan() && y.is_nan())),
        (Value::Decimal(x), Value::Decimal(y)) => Some(x == y),
        (Value::Text(x), Value::Text(y)) => Some(x == y),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x == y),
        _ => None,
    }
}

/// Best-effort matching for unordered elements. Returns how many left
/// elements found no deep-equal partner; each match consumes its right
/// candidate.
fn match_unordered(
    ctx: &Context<'_>,
    left: &[Value],
    right: &[Value],
    path: &FieldPath,
    visited: &HashSet<(usize, usize)>,
) -> DiffResult<usize> {
    let mut remaining: Vec<Value> = right.to_vec();
    let mut unmatched = 0usize;
    for left_element in left {
        let mut matched_at = None;
        for (i, candidate) in remaining.iter().enumerate() {
            if compare(ctx, left_element, candidate, path.clone(), visited)?.is_empty() {
                matched_at = Some(i);
                break;
            }
        }
        match matched_at {
            Some(i) => {
                remaining.remove(i);
            }
            None => unmatched += 1,
        }
    }
    Ok(unmatched)
}

/// Match hashed-map keys as a set. Returns `None` when the key sets are
/// not deep-equal, otherwise the matched `(left key, left value, right
/// value)` triples in left iteration order.
///
/// Callers check sizes first, so every left key matching implies no right
/// key is left over.
fn match_keys(
    ctx: &Context<'_>,
    left: &[(Value, Value)],
    right: &[(Value, Value)],
    path: &FieldPath,
    visited: &HashSet<(usize, usize)>,
) -> DiffResult<Option<Vec<(Value, Value, Value)>>> {
    let mut remaining: Vec<(Value, Value)> = right.to_vec();
    let mut matched = Vec::with_capacity(left.len());
    for (left_key, left_value) in left {
        let mut matched_at = None;
        for (i, (candidate_key, _)) in remaining.iter().enumerate() {
            if compare(ctx, left_key, candidate_key, path.clone(), visited)?.is_empty() {
                matched_at = Some(i);
                break;
            }
        }
        match matched_at {
            Some(i) => {
                let (_, right_value) = remaining.remove(i);
                matched.push((left_key.clone(), left_value.clone(), right_value));
            }
            None => return Ok(None),
        }
    }
    Ok(Some(matched))
}

fn record(differences: &mut Vec<Difference>, dual: &DualKey, reason: DifferenceReason) {
    trace!(path = %dual.path, %reason, "difference recorded");
    differences.push(Difference::new(
        dual.path.clone(),
        dual.left.clone(),
        dual.right.clone(),
        reason,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::deep_hash;
    use dgc_registry::{
        AlwaysEqualComparator, CaseInsensitiveTextComparator, NumericComparator,
    };
    use dgc_types::{FieldAccessError, FieldEnumerator, Record, TypeInfo};
    use std::rc::Rc;

    fn diffs(left: &Value, right: &Value) -> Vec<Difference> {
        determine_differences(
            left,
            right,
            &FieldComparators::new(),
            &TypeComparators::new(),
        )
        .unwrap()
    }

    fn equal(left: &Value, right: &Value) -> bool {
        diffs(left, right).is_empty()
    }

    fn record_of(type_name: &str, fields: Vec<(&str, Value)>) -> Value {
        Record::with_fields(
            TypeInfo::class(type_name).build(),
            fields.into_iter().map(|(n, v)| (n.to_string(), v)).collect(),
        )
        .value()
    }

    fn wrapper(inner: Value) -> Value {
        record_of("wrapper", vec![("o", inner)])
    }

    // ----------------------------------------------------------
    // Identity, nulls, scalars
    // ----------------------------------------------------------

    #[test]
    fn same_node_has_no_differences() {
        let value = record_of("t", vec![("x", Value::Int(1))]);
        assert!(equal(&value, &value));
    }

    #[test]
    fn null_against_value_is_one_difference() {
        let value = Value::Int(1);
        let found = diffs(&Value::Null, &value);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, DifferenceReason::NullMismatch);
        assert!(!equal(&value, &Value::Null));
        assert!(equal(&Value::Null, &Value::Null));
    }

    #[test]
    fn equal_scalars_have_no_differences() {
        assert!(equal(&Value::Int(7), &Value::Int(7)));
        assert!(equal(&Value::text("x"), &Value::text("x")));
        assert!(equal(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
        assert!(equal(&Value::Bool(true), &Value::Bool(true)));
    }

    #[test]
    fn unequal_scalars_differ_at_the_root() {
        let found = diffs(&Value::Int(1), &Value::Int(2));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, DifferenceReason::ValueMismatch);
        assert!(found[0].path.is_root());
    }

    #[test]
    fn decimal_literals_compare_literally_by_default() {
        assert!(!equal(&Value::decimal("1.0"), &Value::decimal("1")));
        assert!(equal(&Value::decimal("1.0"), &Value::decimal("1.0")));
    }

    #[test]
    fn mismatched_kinds_are_one_type_difference() {
        let found = diffs(&Value::text("one"), &Value::Int(1));
        assert_eq!(found.len(), 1);
        assert!(matches!(
            found[0].reason,
            DifferenceReason::TypeMismatch { .. }
        ));

        let list = Value::list_of(vec![Value::Int(1)]);
        let set = Value::set_of(vec![Value::Int(1)]);
        assert!(!equal(&list, &set));
    }

    // ----------------------------------------------------------
    // Arrays and lists
    // ----------------------------------------------------------

    #[test]
    fn equal_arrays_match() {
        let a = Value::array_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::array_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(equal(&a, &b));
    }

    #[test]
    fn array_length_mismatch_is_one_difference_without_element_noise() {
        let a = Value::array_of(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::array_of(vec![Value::Int(9)]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].reason,
            DifferenceReason::LengthMismatch { left: 2, right: 1 }
        );
    }

    #[test]
    fn element_differences_carry_indices() {
        let a = Value::list_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::list_of(vec![Value::Int(1), Value::Int(9), Value::Int(3)]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "[1]");
    }

    #[test]
    fn differences_surface_in_traversal_order() {
        let a = Value::list_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::list_of(vec![Value::Int(9), Value::Int(2), Value::Int(8)]);
        let found = diffs(&a, &b);
        let paths: Vec<String> = found.iter().map(Difference::path_string).collect();
        assert_eq!(paths, vec!["[0]", "[2]"]);
    }

    #[test]
    fn array_and_list_are_different_shapes() {
        let array = Value::array_of(vec![Value::Int(1)]);
        let list = Value::list_of(vec![Value::Int(1)]);
        assert!(!equal(&array, &list));
    }

    // ----------------------------------------------------------
    // Objects
    // ----------------------------------------------------------

    #[test]
    fn structurally_equal_objects_match() {
        let a = record_of(
            "class1",
            vec![("flag", Value::Bool(true)), ("value", Value::Float(1.0))],
        );
        let b = record_of(
            "class1",
            vec![("flag", Value::Bool(true)), ("value", Value::Float(1.0))],
        );
        assert!(equal(&a, &b));
    }

    #[test]
    fn field_difference_names_the_field() {
        let a = record_of("t", vec![("x", Value::Int(1)), ("y", Value::Int(2))]);
        let b = record_of("t", vec![("x", Value::Int(1)), ("y", Value::Int(5))]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "y");
    }

    #[test]
    fn field_differences_follow_declaration_order() {
        let a = record_of("t", vec![("x", Value::Int(1)), ("y", Value::Int(2))]);
        let b = record_of("t", vec![("x", Value::Int(9)), ("y", Value::Int(8))]);
        let paths: Vec<String> = diffs(&a, &b).iter().map(Difference::path_string).collect();
        assert_eq!(paths, vec!["x", "y"]);
    }

    #[test]
    fn differing_field_sets_are_one_difference_both_ways() {
        let a = record_of("t", vec![("x", Value::Int(1))]);
        let b = record_of("t", vec![("x", Value::Int(1)), ("y", Value::Int(2))]);
        for (l, r) in [(&a, &b), (&b, &a)] {
            let found = diffs(l, r);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].reason, DifferenceReason::FieldSetMismatch);
        }
    }

    #[test]
    fn type_names_do_not_matter_when_layouts_agree() {
        let a = record_of("first", vec![("x", Value::Int(1))]);
        let b = record_of("second", vec![("x", Value::Int(1))]);
        assert!(equal(&a, &b));
    }

    #[test]
    fn nested_wrapper_depth_mismatch_differs() {
        let deep = wrapper(wrapper(Value::text("one")));
        let shallow = wrapper(Value::text("one"));
        let found = diffs(&deep, &shallow);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "o");
        assert!(matches!(
            found[0].reason,
            DifferenceReason::TypeMismatch { .. }
        ));
    }

    #[test]
    fn nested_structures_produce_nested_paths() {
        let a = record_of(
            "outer",
            vec![(
                "items",
                Value::list_of(vec![record_of("inner", vec![("name", Value::text("a"))])]),
            )],
        );
        let b = record_of(
            "outer",
            vec![(
                "items",
                Value::list_of(vec![record_of("inner", vec![("name", Value::text("b"))])]),
            )],
        );
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "items[0].name");
    }

    // ----------------------------------------------------------
    // Cycles and sharing
    // ----------------------------------------------------------

    fn self_cycle() -> Value {
        let node = Record::new(TypeInfo::class("node").build());
        node.set("value", Value::Int(1));
        node.set("next", node.value());
        node.value()
    }

    fn two_node_cycle(first: i64, second: i64) -> Value {
        let a = Record::new(TypeInfo::class("node").build());
        let b = Record::new(TypeInfo::class("node").build());
        a.set("value", Value::Int(first));
        a.set("next", b.value());
        b.set("value", Value::Int(second));
        b.set("next", a.value());
        a.value()
    }

    #[test]
    fn self_referencing_graphs_terminate_and_match() {
        let a = self_cycle();
        let b = self_cycle();
        assert!(equal(&a, &a));
        assert!(equal(&a, &b));
    }

    #[test]
    fn two_node_cycles_terminate_and_match() {
        let a = two_node_cycle(1, 2);
        let b = two_node_cycle(1, 2);
        assert!(equal(&a, &b));
    }

    #[test]
    fn cyclic_graphs_with_different_payloads_differ() {
        let a = two_node_cycle(1, 2);
        let b = two_node_cycle(1, 3);
        assert!(!equal(&a, &b));
    }

    #[test]
    fn self_containing_list_terminates() {
        let make = || {
            let list = Value::list_of(vec![Value::Int(1)]);
            if let Value::List(cell) = &list {
                cell.borrow_mut().push(list.clone());
            }
            list
        };
        assert!(equal(&make(), &make()));
    }

    #[test]
    fn self_containing_set_terminates() {
        let make = || {
            let set = Value::set_of(vec![Value::Int(1)]);
            if let Value::Set(cell) = &set {
                let inner = set.clone();
                cell.borrow_mut().elements.push(inner);
            }
            set
        };
        assert!(equal(&make(), &make()));
    }

    #[test]
    fn shared_substructure_matches_copies() {
        let shared = Value::list_of(vec![Value::Int(7)]);
        let with_sharing = Value::list_of(vec![shared.clone(), shared]);
        let without_sharing = Value::list_of(vec![
            Value::list_of(vec![Value::Int(7)]),
            Value::list_of(vec![Value::Int(7)]),
        ]);
        assert!(equal(&with_sharing, &without_sharing));
        assert!(equal(&without_sharing, &with_sharing));
    }

    // ----------------------------------------------------------
    // Sets
    // ----------------------------------------------------------

    #[test]
    fn set_permutations_are_equal() {
        let a = Value::set_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::set_of(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        assert!(equal(&a, &b));
    }

    #[test]
    fn unmatched_set_elements_are_one_aggregate_difference() {
        let a = Value::set_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::set_of(vec![Value::Int(1), Value::Int(5), Value::Int(6)]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].reason,
            DifferenceReason::UnmatchedElements { count: 2 }
        );
        assert!(found[0].path.is_root());
    }

    #[test]
    fn set_size_mismatch_is_one_difference() {
        let a = Value::set_of(vec![Value::Int(1)]);
        let b = Value::set_of(vec![Value::Int(1), Value::Int(2)]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].reason,
            DifferenceReason::SizeMismatch { left: 1, right: 2 }
        );
    }

    #[test]
    fn sorted_and_hashed_sets_with_identical_content_differ() {
        let sorted = Value::sorted_set_of(vec![Value::Int(1), Value::Int(2)]);
        let hashed = Value::set_of(vec![Value::Int(1), Value::Int(2)]);
        let found = diffs(&sorted, &hashed);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, DifferenceReason::OrderingMismatch);
    }

    #[test]
    fn sorted_sets_compare_positionally() {
        let a = Value::sorted_set_of(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        let b = Value::sorted_set_of(vec![Value::Int(2), Value::Int(3), Value::Int(1)]);
        assert!(equal(&a, &b));

        let c = Value::sorted_set_of(vec![Value::Int(1), Value::Int(2), Value::Int(9)]);
        assert!(!equal(&a, &c));
    }

    #[test]
    fn sets_of_equal_objects_match_by_deep_equality() {
        let a = Value::set_of(vec![wrapper(Value::Int(1)), wrapper(Value::Int(2))]);
        let b = Value::set_of(vec![wrapper(Value::Int(2)), wrapper(Value::Int(1))]);
        assert!(equal(&a, &b));
    }

    // ----------------------------------------------------------
    // Maps
    // ----------------------------------------------------------

    fn hashed_map(entries: Vec<(&str, Value)>) -> Value {
        Value::map_of(
            entries
                .into_iter()
                .map(|(k, v)| (Value::text(k), v))
                .collect(),
        )
    }

    #[test]
    fn map_entry_permutations_are_equal() {
        let a = hashed_map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
        let b = hashed_map(vec![("b", Value::Int(2)), ("a", Value::Int(1))]);
        assert!(equal(&a, &b));
    }

    #[test]
    fn map_value_difference_uses_get_notation() {
        let a = hashed_map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
        let b = hashed_map(vec![("a", Value::Int(1)), ("b", Value::Int(9))]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "get(\"b\")");
    }

    #[test]
    fn differing_key_sets_are_one_difference() {
        let a = hashed_map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
        let b = hashed_map(vec![("a", Value::Int(1)), ("c", Value::Int(2))]);
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, DifferenceReason::KeySetMismatch);
    }

    #[test]
    fn sorted_and_hashed_maps_with_identical_entries_differ() {
        let sorted = Value::sorted_map_of(vec![
            (Value::text("a"), Value::Int(1)),
            (Value::text("b"), Value::Int(2)),
        ]);
        let hashed = hashed_map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
        let found = diffs(&sorted, &hashed);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, DifferenceReason::OrderingMismatch);
    }

    #[test]
    fn sorted_maps_compare_positionally() {
        let a = Value::sorted_map_of(vec![
            (Value::text("b"), Value::Int(2)),
            (Value::text("a"), Value::Int(1)),
        ]);
        let b = Value::sorted_map_of(vec![
            (Value::text("a"), Value::Int(1)),
            (Value::text("b"), Value::Int(2)),
        ]);
        assert!(equal(&a, &b));

        let c = Value::sorted_map_of(vec![
            (Value::text("a"), Value::Int(1)),
            (Value::text("b"), Value::Int(9)),
        ]);
        let found = diffs(&a, &c);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "get(\"b\")");
    }

    #[test]
    fn maps_nested_in_objects_render_full_paths() {
        let a = record_of(
            "t",
            vec![("prices", hashed_map(vec![("apple", Value::Int(1))]))],
        );
        let b = record_of(
            "t",
            vec![("prices", hashed_map(vec![("apple", Value::Int(2))]))],
        );
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "prices.get(\"apple\")");
    }

    // ----------------------------------------------------------
    // Comparator overrides
    // ----------------------------------------------------------

    #[test]
    fn case_insensitive_comparator_equates_renamed_hobbits() {
        let left = Value::list_of(vec![
            Value::text("Merry"),
            Value::text("Frodo"),
            Value::text("Merry"),
            Value::text("Sam"),
            Value::text("Frodo"),
            Value::Null,
            Value::Null,
        ]);
        let right = Value::list_of(vec![
            Value::text("MERRY"),
            Value::text("frodo"),
            Value::text("merry"),
            Value::text("sam"),
            Value::text("FRODO"),
            Value::Null,
            Value::Null,
        ]);

        // Default comparison sees five differing positions (nulls match).
        assert_eq!(diffs(&left, &right).len(), 5);

        let mut types = TypeComparators::new();
        types.put("text", Rc::new(CaseInsensitiveTextComparator));
        let found =
            determine_differences(&left, &right, &FieldComparators::new(), &types).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn comparator_mismatch_reports_without_recursion() {
        let mut types = TypeComparators::new();
        types.put("text", Rc::new(CaseInsensitiveTextComparator));
        let found = determine_differences(
            &Value::text("Merry"),
            &Value::text("Pippin"),
            &FieldComparators::new(),
            &types,
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, DifferenceReason::ComparatorMismatch);
    }

    #[test]
    fn decimal_sets_match_under_numeric_comparator() {
        let set = |literals: &[&str]| {
            Value::set_of(literals.iter().map(|s| Value::decimal(*s)).collect())
        };
        let a = set(&["1.0", "3", "2", "4"]);
        let b = set(&["4", "1", "2.0", "3"]);

        // Literal comparison: "1.0" and "2" have no partners.
        let found = diffs(&a, &b);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].reason,
            DifferenceReason::UnmatchedElements { count: 2 }
        );

        let mut types = TypeComparators::new();
        types.put("decimal", Rc::new(NumericComparator));
        assert!(
            determine_differences(&a, &b, &FieldComparators::new(), &types)
                .unwrap()
                .is_empty()
        );

        let c = set(&["4", "1", "2.2", "3"]);
        assert!(
            !determine_differences(&a, &c, &FieldComparators::new(), &types)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn type_comparators_resolve_through_the_hierarchy() {
        // Registered for the `number` superclass, applies to ints.
        let mut types = TypeComparators::new();
        types.put("number", Rc::new(AlwaysEqualComparator));
        let found = determine_differences(
            &Value::Int(1),
            &Value::Int(2),
            &FieldComparators::new(),
            &types,
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn field_path_override_neutralizes_nested_set_contents() {
        let graph = |first: i64, second: i64| {
            record_of(
                "holder",
                vec![(
                    "set",
                    Value::set_of(vec![wrapper(Value::Int(first)), wrapper(Value::Int(second))]),
                )],
            )
        };
        let a = graph(1, 2);
        let b = graph(3, 4);

        assert!(!equal(&a, &b));

        let mut fields = FieldComparators::new();
        fields.put("set.o", Rc::new(AlwaysEqualComparator));
        let found =
            determine_differences(&a, &b, &fields, &TypeComparators::new()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn field_path_override_beats_type_comparator() {
        // The type comparator would report a difference; the field
        // comparator at the same point says equal and wins.
        let mut types = TypeComparators::new();
        types.put("int", Rc::new(|a: &Value, b: &Value| a.render().cmp(&b.render())));
        let mut fields = FieldComparators::new();
        fields.put("x", Rc::new(AlwaysEqualComparator));

        let a = record_of("t", vec![("x", Value::Int(1))]);
        let b = record_of("t", vec![("x", Value::Int(2))]);
        let found = determine_differences(&a, &b, &fields, &types).unwrap();
        assert!(found.is_empty());
    }

    // ----------------------------------------------------------
    // Failure semantics
    // ----------------------------------------------------------

    #[test]
    fn throwing_comparator_aborts_the_run() {
        let mut types = TypeComparators::new();
        // Numeric comparator on text operands fails when invoked.
        types.put("text", Rc::new(NumericComparator));
        let result = determine_differences(
            &Value::text("a"),
            &Value::text("b"),
            &FieldComparators::new(),
            &types,
        );
        assert!(matches!(result, Err(DiffError::Comparator { .. })));
    }

    struct Sealed;

    impl FieldEnumerator for Sealed {
        fn type_info(&self) -> Rc<TypeInfo> {
            TypeInfo::class("sealed").build()
        }
        fn field_names(&self) -> Vec<String> {
            vec!["hidden".into()]
        }
        fn field(&self, name: &str) -> Result<Value, FieldAccessError> {
            Err(FieldAccessError::new("sealed", name, "access denied"))
        }
    }

    #[test]
    fn failing_field_access_aborts_the_run() {
        let a = Value::object(Rc::new(Sealed));
        let b = Value::object(Rc::new(Sealed));
        let result = determine_differences(
            &a,
            &b,
            &FieldComparators::new(),
            &TypeComparators::new(),
        );
        assert!(matches!(result, Err(DiffError::FieldAccess(_))));
    }

    // ----------------------------------------------------------
    // Ignored paths
    // ----------------------------------------------------------

    #[test]
    fn ignored_paths_skip_their_subtrees() {
        let a = record_of("t", vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
        let b = record_of("t", vec![("a", Value::Int(1)), ("b", Value::Int(99))]);

        assert_eq!(diffs(&a, &b).len(), 1);

        let mut config = ComparisonConfig::new();
        config.ignore_path("b");
        assert!(determine_differences_with(&a, &b, &config)
            .unwrap()
            .is_empty());
    }

    // ----------------------------------------------------------
    // Symmetry and hash consistency
    // ----------------------------------------------------------

    #[test]
    fn emptiness_is_symmetric_across_assorted_pairs() {
        let pairs = [
            (Value::Int(1), Value::Int(1)),
            (Value::Int(1), Value::Int(2)),
            (
                Value::set_of(vec![Value::Int(1), Value::Int(2)]),
                Value::set_of(vec![Value::Int(2), Value::Int(1)]),
            ),
            (
                record_of("t", vec![("x", Value::Int(1))]),
                record_of("t", vec![("x", Value::Int(1))]),
            ),
            (
                record_of("t", vec![("x", Value::Int(1))]),
                record_of("t", vec![("y", Value::Int(1))]),
            ),
            (self_cycle(), self_cycle()),
        ];
        for (l, r) in &pairs {
            assert_eq!(equal(l, r), equal(r, l), "asymmetric for {l:?} vs {r:?}");
        }
    }

    #[test]
    fn deep_equal_graphs_share_deep_hashes() {
        let pairs = [
            (
                Value::set_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
                Value::set_of(vec![Value::Int(3), Value::Int(1), Value::Int(2)]),
            ),
            (
                record_of("a", vec![("x", Value::list_of(vec![Value::text("v")]))]),
                record_of("b", vec![("x", Value::list_of(vec![Value::text("v")]))]),
            ),
            (self_cycle(), self_cycle()),
        ];
        for (l, r) in &pairs {
            assert!(equal(l, r));
            assert_eq!(deep_hash(l).unwrap(), deep_hash(r).unwrap());
        }
    }
}

//! Cycle-safe deep hashing.
//!
//! [`deep_hash`] folds an entire value graph into a `u64`, consistent with
//! the engine's default structural equality: two graphs with no differences
//! hash identically (collisions the other way are permitted). Ordered
//! shapes fold their children in order; hashed sets, hashed-map entries,
//! and object fields combine order-independently so permutations hash the
//! same. Custom comparators do not influence the hash.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use dgc_types::{ContainerOrdering, Value};

use crate::error::DiffResult;

const NULL_TAG: u64 = 0x01;
const BOOL_TAG: u64 = 0x02;
const INT_TAG: u64 = 0x03;
const FLOAT_TAG: u64 = 0x04;
const DECIMAL_TAG: u64 = 0x05;
const TEXT_TAG: u64 = 0x06;
const TIMESTAMP_TAG: u64 = 0x07;
const ARRAY_TAG: u64 = 0x08;
const LIST_TAG: u64 = 0x09;
const SET_TAG: u64 = 0x0a;
const SORTED_SET_TAG: u64 = 0x0b;
const MAP_TAG: u64 = 0x0c;
const SORTED_MAP_TAG: u64 = 0x0d;
const OBJECT_TAG: u64 = 0x0e;

/// Marker contributed by a composite revisited on the current hashing path.
const CYCLE_HASH: u64 = 0x9e37_79b9_7f4a_7c15;

/// Compute a deep, cycle-safe hash of a value graph.
///
/// Fails only if a field of an object cannot be read, mirroring the
/// comparison engine's failure semantics.
pub fn deep_hash(value: &Value) -> DiffResult<u64> {
    hash_value(value, &mut HashSet::new())
}

fn hash_value(value: &Value, on_path: &mut HashSet<usize>) -> DiffResult<u64> {
    if let Some(id) = value.identity() {
        if !on_path.insert(id) {
            return Ok(CYCLE_HASH);
        }
    }

    let hash = match value {
        Value::Null => NULL_TAG,
        Value::Bool(b) => combine(BOOL_TAG, hash_one(b)),
        Value::Int(i) => combine(INT_TAG, hash_one(i)),
        Value::Float(x) => combine(FLOAT_TAG, hash_one(&canonical_float_bits(*x))),
        Value::Decimal(s) => combine(DECIMAL_TAG, hash_one(s)),
        Value::Text(s) => combine(TEXT_TAG, hash_one(s)),
        Value::Timestamp(t) => combine(TIMESTAMP_TAG, hash_one(t)),
        Value::Array(items) => {
            let mut hash = ARRAY_TAG;
            for item in items.borrow().iter() {
                hash = combine(hash, hash_value(item, on_path)?);
            }
            hash
        }
        Value::List(items) => {
            let mut hash = LIST_TAG;
            for item in items.borrow().iter() {
                hash = combine(hash, hash_value(item, on_path)?);
            }
            hash
        }
        Value::Set(data) => {
            let data = data.borrow();
            match data.ordering {
                // Sorted sets iterate canonically, so order-sensitive
                // folding is stable for equal content.
                ContainerOrdering::Sorted => {
                    let mut hash = SORTED_SET_TAG;
                    for item in &data.elements {
                        hash = combine(hash, hash_value(item, on_path)?);
                    }
                    hash
                }
                ContainerOrdering::Hashed => {
                    let mut sum = 0u64;
                    for item in &data.elements {
                        sum = sum.wrapping_add(hash_value(item, on_path)?);
                    }
                    combine(SET_TAG, sum)
                }
            }
        }
        Value::Map(data) => {
            let data = data.borrow();
            match data.ordering {
                ContainerOrdering::Sorted => {
                    let mut hash = SORTED_MAP_TAG;
                    for (key, value) in &data.entries {
                        let entry =
                            combine(hash_value(key, on_path)?, hash_value(value, on_path)?);
                        hash = combine(hash, entry);
                    }
                    hash
                }
                ContainerOrdering::Hashed => {
                    let mut sum = 0u64;
                    for (key, value) in &data.entries {
                        let entry =
                            combine(hash_value(key, on_path)?, hash_value(value, on_path)?);
                        sum = sum.wrapping_add(entry);
                    }
                    combine(MAP_TAG, sum)
                }
            }
        }
        // Field declaration order does not affect object equality, so the
        // field contributions combine order-independently.
        Value::Object(enumerator) => {
            let mut sum = 0u64;
            for name in enumerator.field_names() {
                let field = enumerator.field(&name)?;
                let entry = combine(hash_one(&name), hash_value(&field, on_path)?);
                sum = sum.wrapping_add(entry);
            }
            combine(OBJECT_TAG, sum)
        }
    };

    if let Some(id) = value.identity() {
        on_path.remove(&id);
    }
    Ok(hash)
}

/// `0.0`/`-0.0` are equal and all NaNs are equal to each other under the
/// engine's scalar equality, so they must share hash bits.
fn canonical_float_bits(x: f64) -> u64 {
    if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0f64.to_bits()
    } else {
        x.to_bits()
    }
}

fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn combine(a: u64, b: u64) -> u64 {
    a.wrapping_mul(31).wrapping_add(b)
}

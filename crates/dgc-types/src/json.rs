//! JSON interop for the value graph.
//!
//! [`Value::from_json`] builds an acyclic value graph from parsed JSON,
//! which is the quickest way to assemble comparison inputs. JSON objects
//! become sorted maps because `serde_json`'s default map iterates in key
//! order. [`Value::to_json_lossy`] renders a graph back out for reporting;
//! it is lossy by construction (cycles become a marker string, set/map
//! ordering semantics and decimal literals survive only as strings).

use std::collections::HashSet;

use serde_json::json;

use crate::value::Value;

/// Marker emitted for on-path composite revisits during JSON rendering.
const CYCLE_MARKER: &str = "<cycle>";

impl Value {
    /// Build a value graph from parsed JSON.
    ///
    /// Numbers become [`Value::Int`] when they fit in `i64`, otherwise
    /// [`Value::Float`]; arrays become lists; objects become sorted maps
    /// with text keys.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::text(s),
            serde_json::Value::Array(items) => {
                Value::list_of(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::sorted_map_of(
                entries
                    .iter()
                    .map(|(k, v)| (Value::text(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render this graph as JSON for reporting.
    pub fn to_json_lossy(&self) -> serde_json::Value {
        self.to_json_guarded(&mut HashSet::new())
    }

    fn to_json_guarded(&self, on_path: &mut HashSet<usize>) -> serde_json::Value {
        if let Some(id) = self.identity() {
            if !on_path.insert(id) {
                return json!(CYCLE_MARKER);
            }
        }
        let rendered = match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::Float(x) => json!(x),
            Value::Decimal(s) => json!(s),
            Value::Text(s) => json!(s),
            Value::Timestamp(t) => json!(t.to_rfc3339()),
            Value::Array(items) | Value::List(items) => serde_json::Value::Array(
                items
                    .borrow()
                    .iter()
                    .map(|item| item.to_json_guarded(on_path))
                    .collect(),
            ),
            Value::Set(data) => serde_json::Value::Array(
                data.borrow()
                    .elements
                    .iter()
                    .map(|item| item.to_json_guarded(on_path))
                    .collect(),
            ),
            Value::Map(data) => {
                let mut out = serde_json::Map::new();
                for (key, value) in &data.borrow().entries {
                    let rendered_key = match key {
                        Value::Text(s) => s.clone(),
                        other => other.render(),
                    };
                    out.insert(rendered_key, value.to_json_guarded(on_path));
                }
                serde_json::Value::Object(out)
            }
            Value::Object(enumerator) => {
                let mut out = serde_json::Map::new();
                for name in enumerator.field_names() {
                    let rendered = match enumerator.field(&name) {
                        Ok(value) => value.to_json_guarded(on_path),
                        Err(_) => json!("<inaccessible>"),
                    };
                    out.insert(name, rendered);
                }
                serde_json::Value::Object(out)
            }
        };
        if let Some(id) = self.identity() {
            on_path.remove(&id);
        }
        rendered
    }
}

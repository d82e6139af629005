//! The dynamic value graph.
//!
//! [`Value`] is the engine's view of the data under comparison: scalar
//! leaves plus reference-counted composite nodes (arrays, lists, sets,
//! maps, objects). Sharing a composite's `Rc` across several parents models
//! shared substructure; mutating a composite through its cell after
//! construction models reference cycles. [`Value::identity`] exposes the
//! allocation address of composites, which is what cycle detection keys on.
//!
//! Sets and maps carry a [`ContainerOrdering`]: a sorted and a hashed
//! container holding identical content are structurally different, and the
//! ordering flag is how that distinction survives in the model.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::FieldEnumerator;
use crate::type_info::{builtin, TypeInfo};

/// Iteration-order semantics of a set or map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerOrdering {
    /// Iteration follows a canonical sort of the elements or keys.
    Sorted,
    /// Iteration order carries no meaning (hash-like container).
    Hashed,
}

/// Contents of a [`Value::Set`] node.
#[derive(Debug)]
pub struct SetData {
    /// Sorted or hashed semantics.
    pub ordering: ContainerOrdering,
    /// Elements in iteration order.
    pub elements: Vec<Value>,
}

/// Contents of a [`Value::Map`] node.
#[derive(Debug)]
pub struct MapData {
    /// Sorted or hashed semantics.
    pub ordering: ContainerOrdering,
    /// Entries in iteration order.
    pub entries: Vec<(Value, Value)>,
}

/// Classification of a value, the engine's dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Text,
    Timestamp,
    Array,
    List,
    Set,
    Map,
    Object,
}

impl ValueKind {
    /// Scalars compare by native equality and have no children.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            ValueKind::Bool
                | ValueKind::Int
                | ValueKind::Float
                | ValueKind::Decimal
                | ValueKind::Text
                | ValueKind::Timestamp
        )
    }

    /// Composites have identity and children the engine recurses into.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            ValueKind::Array | ValueKind::List | ValueKind::Set | ValueKind::Map | ValueKind::Object
        )
    }
}

/// A node of a dynamically typed value graph.
#[derive(Clone)]
pub enum Value {
    /// The absent value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// An exact decimal literal such as `"1.0"`. Default equality is
    /// literal (`"1.0"` differs from `"1"`); numeric equivalence is a
    /// comparator concern.
    Decimal(String),
    Text(String),
    Timestamp(DateTime<Utc>),
    /// Fixed-length positional array.
    Array(Rc<RefCell<Vec<Value>>>),
    /// Ordered collection.
    List(Rc<RefCell<Vec<Value>>>),
    /// Set with sorted or hashed iteration semantics.
    Set(Rc<RefCell<SetData>>),
    /// Map with sorted or hashed key iteration semantics.
    Map(Rc<RefCell<MapData>>),
    /// A generic object introspected through [`FieldEnumerator`].
    Object(Rc<dyn FieldEnumerator>),
}

impl Value {
    // ---------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------

    /// A text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// An exact decimal literal.
    pub fn decimal(literal: impl Into<String>) -> Self {
        Value::Decimal(literal.into())
    }

    /// A fixed-length array.
    pub fn array_of(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// An ordered collection.
    pub fn list_of(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// A hashed (iteration-order-free) set. Elements are kept in the given
    /// order, which is the deterministic probe order for unordered matching.
    pub fn set_of(elements: Vec<Value>) -> Self {
        Value::Set(Rc::new(RefCell::new(SetData {
            ordering: ContainerOrdering::Hashed,
            elements,
        })))
    }

    /// A sorted set. Elements are canonically ordered on construction so
    /// two sorted sets with equal content iterate identically.
    pub fn sorted_set_of(mut elements: Vec<Value>) -> Self {
        elements.sort_by(Value::canonical_cmp);
        Value::Set(Rc::new(RefCell::new(SetData {
            ordering: ContainerOrdering::Sorted,
            elements,
        })))
    }

    /// A hashed map. Entries are kept in the given order.
    pub fn map_of(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(MapData {
            ordering: ContainerOrdering::Hashed,
            entries,
        })))
    }

    /// A sorted map. Entries are canonically ordered by key on
    /// construction.
    pub fn sorted_map_of(mut entries: Vec<(Value, Value)>) -> Self {
        entries.sort_by(|(a, _), (b, _)| Value::canonical_cmp(a, b));
        Value::Map(Rc::new(RefCell::new(MapData {
            ordering: ContainerOrdering::Sorted,
            entries,
        })))
    }

    /// Wrap a field enumerator as an object node.
    pub fn object(enumerator: Rc<dyn FieldEnumerator>) -> Self {
        Value::Object(enumerator)
    }

    // ---------------------------------------------------------------
    // Classification
    // ---------------------------------------------------------------

    /// Classify this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Text(_) => ValueKind::Text,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Array(_) => ValueKind::Array,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::Map(_) => ValueKind::Map,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// The runtime type descriptor used for comparator resolution.
    ///
    /// Scalars and containers report the built-in hierarchy; objects report
    /// whatever their enumerator declares.
    pub fn type_info(&self) -> Rc<TypeInfo> {
        match self {
            Value::Null => builtin::null(),
            Value::Bool(_) => builtin::boolean(),
            Value::Int(_) => builtin::int(),
            Value::Float(_) => builtin::float(),
            Value::Decimal(_) => builtin::decimal(),
            Value::Text(_) => builtin::text(),
            Value::Timestamp(_) => builtin::timestamp(),
            Value::Array(_) => builtin::array(),
            Value::List(_) => builtin::list(),
            Value::Set(data) => match data.borrow().ordering {
                ContainerOrdering::Sorted => builtin::sorted_set(),
                ContainerOrdering::Hashed => builtin::set(),
            },
            Value::Map(data) => match data.borrow().ordering {
                ContainerOrdering::Sorted => builtin::sorted_map(),
                ContainerOrdering::Hashed => builtin::map(),
            },
            Value::Object(enumerator) => enumerator.type_info(),
        }
    }

    /// The allocation address of a composite node, absent for scalars.
    ///
    /// Two values with the same identity are the same node; the visited-pair
    /// set of the comparison engine is keyed on these addresses.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(cell) | Value::List(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Set(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Map(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Object(enumerator) => Some(Rc::as_ptr(enumerator) as *const () as usize),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same composite node.
    pub fn same_reference(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    // ---------------------------------------------------------------
    // Ordering & rendering
    // ---------------------------------------------------------------

    /// A total, deterministic ordering used to canonicalize sorted
    /// containers: values order by kind first, then within one kind by
    /// native value (numeric, lexicographic, chronological) or by rendered
    /// form for composites. Ranking kinds first keeps the order total when
    /// a container mixes kinds.
    pub fn canonical_cmp(a: &Value, b: &Value) -> Ordering {
        fn rank(value: &Value) -> u8 {
            match value.kind() {
                ValueKind::Null => 0,
                ValueKind::Bool => 1,
                ValueKind::Int => 2,
                ValueKind::Float => 3,
                ValueKind::Decimal => 4,
                ValueKind::Text => 5,
                ValueKind::Timestamp => 6,
                ValueKind::Array => 7,
                ValueKind::List => 8,
                ValueKind::Set => 9,
                ValueKind::Map => 10,
                ValueKind::Object => 11,
            }
        }

        rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Int(x), Value::Int(y)) => x.cmp(y),
            (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
            (Value::Text(x), Value::Text(y)) => x.cmp(y),
            (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
            _ => a.render().cmp(&b.render()),
        })
    }

    /// Render the value to a compact, cycle-safe textual form. On-path
    /// revisits of a composite render as `<cycle>`, so the result is finite
    /// and deterministic for any graph.
    pub fn render(&self) -> String {
        format!("{self}")
    }

    fn fmt_guarded(&self, f: &mut fmt::Formatter<'_>, on_path: &mut HashSet<usize>) -> fmt::Result {
        if let Some(id) = self.identity() {
            if !on_path.insert(id) {
                return f.write_str("<cycle>");
            }
        }
        let result = self.fmt_inner(f, on_path);
        if let Some(id) = self.identity() {
            on_path.remove(&id);
        }
        result
    }

    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>, on_path: &mut HashSet<usize>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Decimal(s) => f.write_str(s),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Array(items) | Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_guarded(f, on_path)?;
                }
                f.write_str("]")
            }
            Value::Set(data) => {
                let data = data.borrow();
                if data.ordering == ContainerOrdering::Sorted {
                    f.write_str("sorted")?;
                }
                f.write_str("{")?;
                for (i, item) in data.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_guarded(f, on_path)?;
                }
                f.write_str("}")
            }
            Value::Map(data) => {
                let data = data.borrow();
                if data.ordering == ContainerOrdering::Sorted {
                    f.write_str("sorted")?;
                }
                f.write_str("{")?;
                for (i, (key, value)) in data.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    key.fmt_guarded(f, on_path)?;
                    f.write_str(": ")?;
                    value.fmt_guarded(f, on_path)?;
                }
                f.write_str("}")
            }
            Value::Object(enumerator) => {
                write!(f, "{} {{", enumerator.type_info().name())?;
                for (i, name) in enumerator.field_names().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: ")?;
                    match enumerator.field(name) {
                        Ok(value) => value.fmt_guarded(f, on_path)?,
                        Err(_) => f.write_str("<inaccessible>")?,
                    }
                }
                f.write_str(" }")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_guarded(f, &mut HashSet::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_guarded(f, &mut HashSet::new())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

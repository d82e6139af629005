//! Field introspection.
//!
//! The comparison engine never reflects over concrete types; it reads
//! object fields through the [`FieldEnumerator`] trait. [`Record`] is the
//! stock implementation backed by an ordered field list; custom
//! implementations can introspect lazily and may fail, which aborts the
//! enclosing comparison.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::type_info::TypeInfo;
use crate::value::Value;

/// A named field of an object could not be read.
///
/// This is fatal to a comparison run: the engine propagates it instead of
/// producing a partial difference list.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot access field `{field}` of `{type_name}`: {reason}")]
pub struct FieldAccessError {
    /// Name of the declaring type.
    pub type_name: String,
    /// Name of the field that could not be read.
    pub field: String,
    /// Why the access failed.
    pub reason: String,
}

impl FieldAccessError {
    /// Create a new error.
    pub fn new(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The field-introspection capability: enumerate an object's accessible
/// instance fields and read them by name.
pub trait FieldEnumerator {
    /// The object's runtime type descriptor.
    fn type_info(&self) -> Rc<TypeInfo>;

    /// Field names in declaration order.
    fn field_names(&self) -> Vec<String>;

    /// Read one field's current value.
    fn field(&self, name: &str) -> Result<Value, FieldAccessError>;
}

/// The stock [`FieldEnumerator`]: a type descriptor plus an ordered list of
/// named field values.
///
/// Fields can be set after construction through [`Record::set`], which is
/// how reference cycles are built: create the record, wrap it with
/// [`Record::value`], then store that value back into one of its own
/// fields.
pub struct Record {
    type_info: Rc<TypeInfo>,
    fields: RefCell<Vec<(String, Value)>>,
}

impl Record {
    /// An empty record of the given type.
    pub fn new(type_info: Rc<TypeInfo>) -> Rc<Self> {
        Rc::new(Self {
            type_info,
            fields: RefCell::new(Vec::new()),
        })
    }

    /// A record with the given fields, in declaration order.
    pub fn with_fields(type_info: Rc<TypeInfo>, fields: Vec<(String, Value)>) -> Rc<Self> {
        Rc::new(Self {
            type_info,
            fields: RefCell::new(fields),
        })
    }

    /// Set a field, replacing an existing value or appending a new field at
    /// the end of the declaration order.
    pub fn set(&self, name: &str, value: Value) {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => fields.push((name.to_string(), value)),
        }
    }

    /// Wrap this record as a [`Value::Object`] node. Clones of the returned
    /// value share this record's identity.
    pub fn value(self: &Rc<Self>) -> Value {
        Value::Object(self.clone())
    }
}

impl FieldEnumerator for Record {
    fn type_info(&self) -> Rc<TypeInfo> {
        self.type_info.clone()
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    fn field(&self, name: &str) -> Result<Value, FieldAccessError> {
        self.fields
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                FieldAccessError::new(self.type_info.name(), name, "no such field")
            })
    }
}

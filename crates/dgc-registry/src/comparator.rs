//! The comparator trait.

use std::cmp::Ordering;

use thiserror::Error;

use dgc_types::Value;

/// A comparator failed while being invoked.
///
/// Comparator failures are configuration errors: the enclosing comparison
/// aborts with no partial result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ComparatorError {
    message: String,
}

impl ComparatorError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A pluggable equality/ordering predicate over pairs of values.
///
/// `Ordering::Equal` means the pair is considered equal and the engine does
/// not recurse into it; any other ordering records a difference at the
/// current path. Returning an error aborts the whole comparison.
pub trait ValueComparator {
    /// Compare two values.
    fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, ComparatorError>;
}

/// Infallible closures are comparators.
impl<F> ValueComparator for F
where
    F: Fn(&Value, &Value) -> Ordering,
{
    fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, ComparatorError> {
        Ok(self(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_comparators() {
        let cmp = |a: &Value, b: &Value| a.render().cmp(&b.render());
        assert_eq!(
            cmp.compare(&Value::Int(1), &Value::Int(1)).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            cmp.compare(&Value::Int(1), &Value::Int(2)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn error_carries_message() {
        let err = ComparatorError::new("bad operand");
        assert_eq!(err.to_string(), "bad operand");
    }
}

//! Stock comparators.
//!
//! Ready-made comparators for the common override cases: numeric
//! equivalence across the numeric scalar kinds (with exact decimal-literal
//! normalization, so `"1.0"` equals `"1"`), case-insensitive text, and the
//! always-equal comparator used to neutralize a subtree.

use std::cmp::Ordering;

use dgc_types::Value;

use crate::comparator::{ComparatorError, ValueComparator};

/// Considers every pair of values equal.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysEqualComparator;

impl ValueComparator for AlwaysEqualComparator {
    fn compare(&self, _left: &Value, _right: &Value) -> Result<Ordering, ComparatorError> {
        Ok(Ordering::Equal)
    }
}

/// Compares text values ignoring case.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseInsensitiveTextComparator;

impl ValueComparator for CaseInsensitiveTextComparator {
    fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, ComparatorError> {
        match (left, right) {
            (Value::Text(a), Value::Text(b)) => Ok(a.to_lowercase().cmp(&b.to_lowercase())),
            _ => Err(ComparatorError::new(format!(
                "case-insensitive text comparator cannot compare {:?} and {:?}",
                left.kind(),
                right.kind()
            ))),
        }
    }
}

/// Compares numeric scalars by value rather than by representation.
///
/// Two decimals compare exactly (sign, integer digits, fractional digits;
/// no floating-point rounding). Mixed numeric kinds convert to `f64`.
/// Non-numeric operands and malformed decimal literals are errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericComparator;

impl ValueComparator for NumericComparator {
    fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, ComparatorError> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => {
                Ok(parse_decimal(a)?.cmp(&parse_decimal(b)?))
            }
            _ => Ok(as_f64(left)?.total_cmp(&as_f64(right)?)),
        }
    }
}

fn as_f64(value: &Value) -> Result<f64, ComparatorError> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(x) => Ok(*x),
        Value::Decimal(s) => s.parse::<f64>().map_err(|_| {
            ComparatorError::new(format!("malformed decimal literal: {s:?}"))
        }),
        other => Err(ComparatorError::new(format!(
            "numeric comparator cannot compare non-numeric {:?}",
            other.kind()
        ))),
    }
}

/// A decimal literal normalized for exact comparison: sign, integer digits
/// without leading zeros, fractional digits without trailing zeros.
#[derive(Debug, PartialEq, Eq)]
struct ParsedDecimal {
    negative: bool,
    int_digits: String,
    frac_digits: String,
}

impl ParsedDecimal {
    fn is_zero(&self) -> bool {
        self.int_digits.is_empty() && self.frac_digits.is_empty()
    }

    /// Compare magnitudes, ignoring sign.
    fn magnitude_cmp(&self, other: &Self) -> Ordering {
        self.int_digits
            .len()
            .cmp(&other.int_digits.len())
            .then_with(|| self.int_digits.cmp(&other.int_digits))
            .then_with(|| self.frac_digits.cmp(&other.frac_digits))
    }
}

impl PartialOrd for ParsedDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.magnitude_cmp(other),
            (true, true) => other.magnitude_cmp(self),
        }
    }
}

/// Parse a plain decimal literal (`[+-]digits[.digits]`). Scientific
/// notation is rejected.
fn parse_decimal(literal: &str) -> Result<ParsedDecimal, ComparatorError> {
    let malformed = || ComparatorError::new(format!("malformed decimal literal: {literal:?}"));

    let (negative, rest) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal.strip_prefix('+').unwrap_or(literal)),
    };

    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rest, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(malformed());
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(malformed());
    }

    let int_digits = int_part.trim_start_matches('0').to_string();
    let frac_digits = frac_part.trim_end_matches('0').to_string();

    let mut parsed = ParsedDecimal {
        negative,
        int_digits,
        frac_digits,
    };
    // "-0" and "0" are the same value.
    if parsed.is_zero() {
        parsed.negative = false;
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num_cmp(a: &Value, b: &Value) -> Ordering {
        NumericComparator.compare(a, b).unwrap()
    }

    // ----------------------------------------------------------
    // Decimal normalization
    // ----------------------------------------------------------

    #[test]
    fn trailing_zeros_do_not_matter() {
        assert_eq!(
            num_cmp(&Value::decimal("1.0"), &Value::decimal("1")),
            Ordering::Equal
        );
        assert_eq!(
            num_cmp(&Value::decimal("2.20"), &Value::decimal("2.2")),
            Ordering::Equal
        );
    }

    #[test]
    fn leading_zeros_do_not_matter() {
        assert_eq!(
            num_cmp(&Value::decimal("007"), &Value::decimal("7")),
            Ordering::Equal
        );
    }

    #[test]
    fn signed_zeros_are_equal() {
        assert_eq!(
            num_cmp(&Value::decimal("-0"), &Value::decimal("0.00")),
            Ordering::Equal
        );
    }

    #[test]
    fn fractional_ordering_is_numeric() {
        assert_eq!(
            num_cmp(&Value::decimal("1.5"), &Value::decimal("1.55")),
            Ordering::Less
        );
        assert_eq!(
            num_cmp(&Value::decimal("0.49"), &Value::decimal("0.5")),
            Ordering::Less
        );
        assert_eq!(
            num_cmp(&Value::decimal("10"), &Value::decimal("9.99")),
            Ordering::Greater
        );
    }

    #[test]
    fn negative_ordering_is_reversed() {
        assert_eq!(
            num_cmp(&Value::decimal("-2"), &Value::decimal("-1.5")),
            Ordering::Less
        );
        assert_eq!(
            num_cmp(&Value::decimal("-1"), &Value::decimal("1")),
            Ordering::Less
        );
    }

    #[test]
    fn scientific_notation_is_rejected() {
        let err = NumericComparator
            .compare(&Value::decimal("1e5"), &Value::decimal("1"))
            .unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    // ----------------------------------------------------------
    // Cross-kind numeric comparison
    // ----------------------------------------------------------

    #[test]
    fn int_and_float_compare_by_value() {
        assert_eq!(num_cmp(&Value::Int(2), &Value::Float(2.0)), Ordering::Equal);
        assert_eq!(num_cmp(&Value::Int(2), &Value::Float(2.5)), Ordering::Less);
    }

    #[test]
    fn decimal_and_int_compare_by_value() {
        assert_eq!(
            num_cmp(&Value::decimal("3.0"), &Value::Int(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn non_numeric_operand_is_an_error() {
        assert!(NumericComparator
            .compare(&Value::text("1"), &Value::Int(1))
            .is_err());
    }

    // ----------------------------------------------------------
    // Other stock comparators
    // ----------------------------------------------------------

    #[test]
    fn case_insensitive_text() {
        let cmp = CaseInsensitiveTextComparator;
        assert_eq!(
            cmp.compare(&Value::text("Merry"), &Value::text("MERRY"))
                .unwrap(),
            Ordering::Equal
        );
        assert_ne!(
            cmp.compare(&Value::text("Merry"), &Value::text("Pippin"))
                .unwrap(),
            Ordering::Equal
        );
        assert!(cmp.compare(&Value::text("x"), &Value::Int(1)).is_err());
    }

    #[test]
    fn always_equal_ignores_operands() {
        assert_eq!(
            AlwaysEqualComparator
                .compare(&Value::Int(1), &Value::text("one"))
                .unwrap(),
            Ordering::Equal
        );
    }
}

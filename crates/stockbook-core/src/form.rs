//! # Form Input Coercion
//!
//! Form fields arrive as whatever the user typed. Numeric fields follow one
//! rule everywhere: anything that does not read as a number becomes zero.
//! Nothing in this module returns an error.
//!
//! ```text
//!   "250"    → 250
//!   " 18.5 " → 18.5
//!   "1e3"    → 1000
//!   ""       → 0
//!   "abc"    → 0
//!   null     → 0
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parses a form field as a decimal, coercing anything unreadable to zero.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use stockbook_core::form::parse_decimal;
///
/// assert_eq!(parse_decimal("12.50"), Decimal::new(1250, 2));
/// assert_eq!(parse_decimal("twelve"), Decimal::ZERO);
/// ```
pub fn parse_decimal(input: &str) -> Decimal {
    let input = input.trim();
    if input.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .unwrap_or(Decimal::ZERO)
}

/// Coerces an arbitrary JSON value to a decimal.
///
/// Strings go through [`parse_decimal`]; numbers are read from their
/// literal text so `50.5` stays exactly `50.5`; everything else is zero.
pub fn coerce_value(value: &Value) -> Decimal {
    match value {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => Decimal::ZERO,
    }
}

/// Serde helper for numeric form fields: `#[serde(deserialize_with = "lenient")]`.
///
/// Works for any type built from a `Decimal` (`Money`, `Percent`, `Decimal`).
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<Decimal>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::from(coerce_value(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("250"), dec!(250));
        assert_eq!(parse_decimal(" 18.5 "), dec!(18.5));
        assert_eq!(parse_decimal("-3"), dec!(-3));
        assert_eq!(parse_decimal("1e3"), dec!(1000));
    }

    #[test]
    fn test_parse_decimal_coerces_garbage_to_zero() {
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("   "), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal("12abc"), Decimal::ZERO);
        assert_eq!(parse_decimal("NaN"), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value(&json!(50.5)), dec!(50.5));
        assert_eq!(coerce_value(&json!(4)), dec!(4));
        assert_eq!(coerce_value(&json!("7.25")), dec!(7.25));
        assert_eq!(coerce_value(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_value(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_value(&json!([1])), Decimal::ZERO);
    }

    #[derive(Deserialize)]
    struct Field {
        #[serde(deserialize_with = "lenient", default)]
        rate: Money,
    }

    #[test]
    fn test_lenient_field() {
        let field: Field = serde_json::from_value(json!({ "rate": "" })).unwrap();
        assert_eq!(field.rate, Money::zero());

        let field: Field = serde_json::from_value(json!({ "rate": 99.9 })).unwrap();
        assert_eq!(field.rate, Money::new(dec!(99.9)));

        let field: Field = serde_json::from_value(json!({})).unwrap();
        assert_eq!(field.rate, Money::zero());
    }
}

//! Common helpers shared across the client and the demo simulator

use rust_decimal::Decimal;
use serde_json::Value;

/// Lenient numeric coercion for JSON values.
///
/// Request bodies coming from forms carry quantities and prices either as
/// JSON numbers or as numeric strings; the backend accepts both, so the
/// demo simulator does too. Anything else coerces to zero.
pub fn decimal_from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else {
                n.as_f64()
                    .and_then(Decimal::from_f64_retain)
                    .unwrap_or_default()
            }
        }
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

/// Lenient integer coercion, zero on anything non-numeric.
pub fn i64_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| {
            n.as_f64().map(|f| f as i64).unwrap_or(0)
        }),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// String coercion: returns `None` for missing or non-string values.
pub fn string_from_value(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

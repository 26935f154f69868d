//! Read-back type coercion for cell values.
//!
//! The row store keeps whatever scalar the writer supplied; most writers send
//! strings. On retrieve, string cells that spell booleans or numbers are
//! lifted back to their typed form. Cells that are already typed pass
//! through untouched.

use serde_json::{Number, Value};

/// Coerces a stored cell for read-back.
///
/// `"TRUE"` / `"Yes"` become `true`, `"FALSE"` / `"No"` become `false`,
/// numeric strings become numbers, everything else is returned unchanged.
pub fn coerce_cell(value: Value) -> Value {
    match value {
        Value::String(text) => coerce_text(text),
        other => other,
    }
}

fn coerce_text(text: String) -> Value {
    match text.as_str() {
        "TRUE" | "Yes" => return Value::Bool(true),
        "FALSE" | "No" => return Value::Bool(false),
        _ => {},
    }

    match parse_number(&text) {
        Some(number) => Value::Number(number),
        None => Value::String(text),
    }
}

/// Parses a string that is entirely a number. Integers stay integers;
/// anything non-finite or padded with whitespace is not a number here.
fn parse_number(text: &str) -> Option<Number> {
    if text.is_empty() || text.trim() != text {
        return None;
    }

    if let Ok(integer) = text.parse::<i64>() {
        return Some(Number::from(integer));
    }

    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => Number::from_f64(float),
        _ => None,
    }
}

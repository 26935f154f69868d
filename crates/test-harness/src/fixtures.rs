//! Canonical payload builders for tests.

use serde_json::{json, Value};

/// A positional payload with explicit headers, values and hash.
pub fn positional_payload(headers: &[&str], values: &[Value], hash: &str) -> Value {
    json!({
        "headers": headers,
        "values": values,
        "hash": hash,
    })
}

/// A legacy fixed-field payload carrying only role, function and hash.
pub fn legacy_payload(role: &str, func: &str, hash: &str) -> Value {
    json!({
        "role": role,
        "func": func,
        "hash": hash,
    })
}

/// A realistic survey submission as the current front-end sends it.
pub fn survey_payload(hash: &str) -> Value {
    json!({
        "headers": [
            "Timestamp", "Role", "Function", "Builder Score", "Operator Score",
            "Archetype", "Consent"
        ],
        "values": [
            "2023-11-14T22:13:20Z", "Engineer", "Platform", "42", "17",
            "Builder", "Yes"
        ],
        "hash": hash,
    })
}

//! Lenient scalar coercions for backend payloads.
//!
//! The backend is loose about scalar types: amounts arrive as strings or
//! numbers, counters sometimes as numeric strings, optional fields as
//! missing or `null`. These helpers turn any of those into the single
//! shape a view model field expects.

use serde_json::Value;

/// Timestamp used when the backend omits a date entirely.
pub const EPOCH_ISO: &str = "1970-01-01T00:00:00.000Z";

/// Renders a string or finite number as text, `fallback` otherwise.
#[must_use]
pub fn normalize_string(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_to_string(n).unwrap_or_else(|| fallback.to_string()),
        _ => fallback.to_string(),
    }
}

/// Like [`normalize_string`] but trims, and maps empty to `None`.
#[must_use]
pub fn normalize_nullable_string(value: Option<&Value>) -> Option<String> {
    let normalized = normalize_string(value, "");
    let trimmed = normalized.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Like [`normalize_string`] but maps empty to `None` without trimming.
#[must_use]
pub fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let normalized = normalize_string(value, "");
    (!normalized.is_empty()).then_some(normalized)
}

/// Coerces to a non-negative whole number; anything non-numeric is `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_count(value: Option<&Value>) -> u64 {
    match coerce_number(value) {
        Some(n) if n.is_finite() && n > 0.0 => n.floor() as u64,
        _ => 0,
    }
}

/// Returns the date string as sent, or the Unix epoch when missing.
#[must_use]
pub fn normalize_date(value: Option<&Value>) -> String {
    let raw = normalize_string(value, "");
    if raw.is_empty() {
        EPOCH_ISO.to_string()
    } else {
        raw
    }
}

/// Clamps a requested page or limit to at least `1`.
#[must_use]
pub fn normalize_positive_int(value: Option<u32>, fallback: u32) -> u32 {
    value.map_or(fallback, |v| v.max(1))
}

/// Boolean coercion: `false`, `0`, `""`, `null` and missing are false.
#[must_use]
pub fn normalize_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

/// Keeps a JSON object, anything else becomes `None`.
#[must_use]
pub fn normalize_object(value: Option<&Value>) -> Option<Value> {
    match value {
        Some(v @ Value::Object(_)) => Some(v.clone()),
        _ => None,
    }
}

/// Numeric coercion with the loose rules the backend relies on: numeric
/// strings count, blank strings and `null` are zero, missing is not a
/// number.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integers keep their digits; whole floats drop the `.0`.
fn number_to_string(n: &serde_json::Number) -> Option<String> {
    if n.is_i64() || n.is_u64() {
        return Some(n.to_string());
    }
    let f = n.as_f64().filter(|f| f.is_finite())?;
    if f.fract() == 0.0 && f.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        return Some((f as i64).to_string());
    }
    Some(f.to_string())
}

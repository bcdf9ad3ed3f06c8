//! Lenient extraction of the structured pick from a model reply
//!
//! The reply is untrusted free-form text that should contain one JSON
//! object of shape `{ "index": <number>, "reason": "..." }`. Extraction is
//! bounded-effort and never raises: anything unrecoverable maps to `None`.

use serde_json::Value;

/// A structured pick as the model produced it, before index sanitization.
///
/// `index` stays a float here: fractional and out-of-range values are
/// legal model output and are clamped later, not rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPick {
    pub index: f64,
    pub reason: Option<String>,
}

/// Recover a structured pick from raw model text.
///
/// Takes the substring between the first `{` and the last `}`, parses it as
/// JSON and reads a numeric `index` (numeric strings are accepted, matching
/// JS `Number()` coercion). Returns `None` when no parseable object with a
/// usable index exists.
pub fn try_parse_structured_pick(raw: &str) -> Option<RawPick> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    let value: Value = serde_json::from_str(&raw[start..=end]).ok()?;

    let index = match value.get("index") {
        Some(Value::Number(n)) => n.as_f64()?,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    let reason = value
        .get("reason")
        .and_then(|r| r.as_str())
        .map(str::to_owned);

    Some(RawPick { index, reason })
}

/// Clamp a raw index into `[0, len - 1]`.
///
/// Negative values go to 0, overflowing values to `len - 1`, fractional
/// values are truncated after clamping. `len` must be positive.
pub fn clamp_index(index: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    index.clamp(0.0, (len - 1) as f64) as usize
}

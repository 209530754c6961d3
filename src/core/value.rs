use crate::core::{Result, SyncError};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // Hours are unbounded; minutes and seconds must stay below 60.
    static ref DURATION_RE: Regex = Regex::new(r"^(\d+):([0-5]?\d):([0-5]?\d)$").unwrap();
}

/// Coerce a raw payload field to an integer.
///
/// The upstream API is inconsistent about numeric types: counters arrive
/// sometimes as JSON numbers, sometimes as decimal strings.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerce a raw payload field to a float. Same string/number leniency as
/// [`as_i64`].
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn as_str(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Derive fractional hours from the upstream flight-time field.
///
/// The listing encodes "no recorded time" as the integer `-1`; otherwise the
/// field is an `"H:MM:SS"` string. Returns `Ok(None)` when the field is
/// absent or null, `Err(MalformedDuration)` when present but unparseable.
pub fn flight_time_hours(value: Option<&Value>) -> Result<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    if as_i64(value) == Some(-1) {
        return Ok(Some(0.0));
    }
    let raw = match value {
        Value::String(s) => s.as_str(),
        other => return Err(SyncError::MalformedDuration(other.to_string())),
    };
    let captures = DURATION_RE
        .captures(raw.trim())
        .ok_or_else(|| SyncError::MalformedDuration(raw.to_string()))?;

    // The pattern guarantees each group is a short decimal integer.
    let hours: f64 = captures[1].parse().unwrap_or(0.0);
    let minutes: f64 = captures[2].parse().unwrap_or(0.0);
    let seconds: f64 = captures[3].parse().unwrap_or(0.0);

    Ok(Some(hours + minutes / 60.0 + seconds / 3600.0))
}

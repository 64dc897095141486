//! Lenient decoding of the persisted task list.
//!
//! Stored data may have been written by older builds or edited by hand, so
//! decoding never fails: an unreadable payload is an empty list, unreadable
//! entries are dropped, and unreadable fields fall back to defaults.

use serde_json::{Map, Value};

use super::models::Task;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub tasks: Vec<Task>,
    /// Entries skipped because they were not objects or lacked a string id/title.
    pub dropped: usize,
}

pub fn decode_tasks(raw: &str, now: i64) -> Decoded {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
        return Decoded::default();
    };

    let mut decoded = Decoded::default();
    for entry in &entries {
        match entry.as_object().and_then(|map| decode_entry(map, now)) {
            Some(task) => decoded.tasks.push(task),
            None => decoded.dropped += 1,
        }
    }
    decoded
}

pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

fn decode_entry(map: &Map<String, Value>, now: i64) -> Option<Task> {
    let id = map.get("id")?.as_str()?;
    let title = map.get("title")?.as_str()?;
    Some(Task {
        id: id.to_string(),
        title: title.to_string(),
        completed: map.get("completed").is_some_and(truthy),
        created_at: timestamp_or(map.get("createdAt"), now),
        updated_at: timestamp_or(map.get("updatedAt"), now),
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion of a stored timestamp, following JavaScript `Number()`.
/// Zero, non-finite and non-numeric values all resolve to `now`.
fn timestamp_or(value: Option<&Value>, now: i64) -> i64 {
    match value.and_then(numeric) {
        Some(n) if n.is_finite() && n != 0.0 => n.trunc() as i64,
        _ => now,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => numeric_str(s),
        // An array coerces through its joined string form
        Value::Array(items) => match items.as_slice() {
            [] | [Value::Null] => Some(0.0),
            [item @ (Value::Number(_) | Value::String(_) | Value::Array(_))] => numeric(item),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

fn numeric_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return s.parse::<f64>().ok(),
    };
    let digits = &s[2..];
    if digits.starts_with('+') {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

//! Dotted-key lookup over JSON documents.
//!
//! A dotted key such as `data.messages.0.title` is split on `.` and each
//! segment is applied in turn: object segments select a member, array segments
//! must parse as a non-negative index. Anything else ends the walk.

use serde_json::Value;

/// Resolves `dotted_key` inside `value`.
///
/// Returns `None` when any segment is missing or when an intermediate value
/// can't be indexed (a string, number, bool or null).
pub fn lookup<'a>(value: &'a Value, dotted_key: &str) -> Option<&'a Value> {
    dotted_key
        .split('.')
        .try_fold(value, |current, segment| step(current, segment))
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Like [`lookup`], but only descends through objects.
pub fn lookup_in_objects<'a>(value: &'a Value, dotted_key: &str) -> Option<&'a Value> {
    dotted_key
        .split('.')
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

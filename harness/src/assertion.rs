//! Declarative checks against an [`ApiResponse`].
//!
//! Every check logs at info level when it passes and otherwise returns an
//! [`AssertionError`] whose message can be used as the failure line of a test
//! report as is.

use crate::{json_path, response::ApiResponse, util};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::info;

const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct AssertionError(String);

impl AssertionError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        AssertionError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

pub type AssertionResult = Result<(), AssertionError>;

/// Checks that the status code is exactly `expected`.
pub fn assert_status_code(response: &ApiResponse, expected: u16) -> AssertionResult {
    let actual = response.status_code;
    if actual != expected {
        return Err(AssertionError(format!(
            "status code assertion failed: expected {}, actual {}",
            expected, actual
        )));
    }

    info!("✓ status code assertion passed: {}", actual);
    Ok(())
}

/// Checks that `dotted_key` resolves in the JSON body and, when `expected` is
/// given, that the value found equals it.
///
/// A failed lookup names the whole key, whichever segment was missing.
///
/// # Arguments
/// `response` - the response under test.
/// `dotted_key` - a path such as `data.user.name` or `data.messages.0.title`.
/// `expected` - the value the field must hold, or `None` to only check presence.
pub fn assert_json_contains(
    response: &ApiResponse,
    dotted_key: &str,
    expected: Option<&Value>,
) -> AssertionResult {
    let body = parse_body(response)?;
    let actual = resolve(&body, dotted_key)?;

    match expected {
        Some(expected) if !values_equal(actual, expected) => Err(AssertionError(format!(
            "field value assertion failed: {} expected {}, actual {}",
            dotted_key, expected, actual
        ))),
        Some(_) => {
            info!("✓ field value assertion passed: {} = {}", dotted_key, actual);
            Ok(())
        }
        None => {
            info!("✓ field exists assertion passed: {}", dotted_key);
            Ok(())
        }
    }
}

/// Checks every `(dotted key, value)` pair of `expected_subset` against the
/// body. Fields the subset doesn't mention are ignored.
pub fn assert_json_equal(response: &ApiResponse, expected_subset: &Value) -> AssertionResult {
    let expected_subset = expected_subset.as_object().ok_or_else(|| {
        AssertionError(format!(
            "expected subset must be a JSON object, got {}",
            expected_subset
        ))
    })?;
    let body = parse_body(response)?;

    for (key, expected) in expected_subset {
        let actual = resolve(&body, key)?;
        if !values_equal(actual, expected) {
            return Err(AssertionError(format!(
                "field {} mismatch: expected {}, actual {}",
                key, expected, actual
            )));
        }
    }

    info!("✓ JSON subset assertion passed");
    Ok(())
}

/// Checks the round trip measured by the client against `max_seconds`.
pub fn assert_response_time(response: &ApiResponse, max_seconds: f64) -> AssertionResult {
    let actual = response.elapsed.as_secs_f64();
    if actual > max_seconds {
        return Err(AssertionError(format!(
            "response time too long: {:.2}s > {:.2}s",
            actual, max_seconds
        )));
    }

    info!("✓ response time assertion passed: {:.2}s", actual);
    Ok(())
}

pub fn assert_success(response: &ApiResponse) -> AssertionResult {
    if !response.is_success() {
        return Err(AssertionError(format!(
            "request failed: status code {}",
            response.status_code
        )));
    }

    info!("✓ success assertion passed");
    Ok(())
}

fn parse_body(response: &ApiResponse) -> Result<Value, AssertionError> {
    response.json_value().map_err(|_| {
        AssertionError(format!(
            "response is not valid JSON: {}",
            util::truncate(&response.text(), BODY_EXCERPT_CHARS)
        ))
    })
}

// Numbers compare by value, so `30` equals `30.0`.
fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).map_or(false, |b| values_equal(a, b)))
        }
        _ => actual == expected,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn resolve<'a>(body: &'a Value, dotted_key: &str) -> Result<&'a Value, AssertionError> {
    json_path::lookup(body, dotted_key)
        .ok_or_else(|| AssertionError(format!("field does not exist: {}", dotted_key)))
}

//! Precondition checks used by every public entry point that accepts
//! external input.
//!
//! All checks are synchronous and side-effect-free apart from returning
//! `Err`. Checks over dynamically-typed values operate on
//! [`serde_json::Value`], the crate's representation of untyped data at the
//! API boundary.
//!
//! Failure messages are rendered from a caller-supplied template:
//! `@` is replaced with the offending value, and for range checks `@1`/`@2`
//! with the lower/upper bound. Bounds are substituted first so a value that
//! itself contains `@1` or `@2` cannot clobber them.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

/// Optional http/https scheme, host with at least one dot, optional port,
/// optional path.
static URL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?[\w-]+(\.[\w-]+)+\.?(:\d+)?(/\S*)?$").expect("valid URL pattern")
});

/// The runtime kind of a JSON value, used by [`require_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

/// Strings substitute their unquoted contents; everything else uses its
/// JSON rendering.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render(template: &str, value: &Value) -> String {
    template.replace('@', &display(value))
}

fn render_range(template: &str, value: &Value, min: f64, max: f64) -> String {
    // Bounds first: "@" would otherwise eat the "@" of "@1"/"@2".
    template
        .replace("@1", &min.to_string())
        .replace("@2", &max.to_string())
        .replace('@', &display(value))
}

/// Fails with [`Error::TypeMismatch`] when `value` is JSON null.
pub fn require_exists(value: &Value, message: &str) -> Result<()> {
    if value.is_null() {
        return Err(Error::TypeMismatch(render(message, value)));
    }
    Ok(())
}

/// Fails with [`Error::TypeMismatch`] unless `value` is a JSON number.
/// Returns the numeric value on success.
pub fn require_number(value: &Value, message: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::TypeMismatch(render(message, value)))
}

/// Fails with [`Error::TypeMismatch`] if `value` is not numeric, and with
/// [`Error::RangeViolation`] if it lies outside `[min, max]` (inclusive).
pub fn require_in_range(value: &Value, min: f64, max: f64, message: &str) -> Result<f64> {
    let Some(number) = value.as_f64() else {
        return Err(Error::TypeMismatch(render_range(message, value, min, max)));
    };

    if number < min || number > max {
        return Err(Error::RangeViolation(render_range(message, value, min, max)));
    }

    Ok(number)
}

/// Fails with [`Error::TypeMismatch`] unless `value` is a JSON string.
/// Returns the string slice on success.
pub fn require_string<'a>(value: &'a Value, message: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::TypeMismatch(render(message, value)))
}

/// Fails with [`Error::TypeMismatch`] unless `value` looks like a URL.
pub fn require_url(value: &str, message: &str) -> Result<()> {
    if !URL_SHAPE.is_match(value) {
        return Err(Error::TypeMismatch(message.replace('@', value)));
    }
    Ok(())
}

/// Fails with [`Error::TypeMismatch`] unless `text` parses as a JSON
/// document (object or array; `null` is excluded). Returns the parsed
/// value on success.
pub fn require_json(text: &str, message: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|_| Error::TypeMismatch(message.replace('@', text)))?;

    if !(parsed.is_object() || parsed.is_array()) {
        return Err(Error::TypeMismatch(message.replace('@', text)));
    }

    Ok(parsed)
}

/// The instance-of check: fails with [`Error::TypeMismatch`] if `value` is
/// null or its kind differs from `kind`.
pub fn require_kind(value: &Value, kind: ValueKind, message: &str) -> Result<()> {
    if value.is_null() || ValueKind::of(value) != kind {
        return Err(Error::TypeMismatch(render(message, value)));
    }
    Ok(())
}

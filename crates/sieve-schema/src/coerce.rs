//! # Runtime Types and Coercion
//!
//! Classifies values by runtime type and converts primitives between
//! `boolean`, `number` and `string` when `convertPrimitives` is enabled.
//!
//! Conversion rules:
//!
//! - to `number` / `integer`: booleans become `1` / `0`; strings are parsed
//!   after trimming whitespace. Empty or non-finite text fails. For
//!   `integer` the parsed value must be whole and comes out as an integer.
//! - to `boolean`: numbers `0` / `1`, strings `"true"` / `"false"` in any
//!   ASCII case. Anything else fails.
//! - to `string`: booleans and numbers print their textual form. `null`
//!   does not convert.
//! - `null`, `array` and `object` never convert from another runtime type.

use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::schema::SchemaType;

/// Runtime type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a number has no fractional part.
pub fn is_whole(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// Match `value` against a declared type, converting it when `convert` is set.
///
/// Returns the accepted (possibly converted) value, or hands the original
/// value back so the caller can try its next declared type.
pub fn coerce(value: Value, target: SchemaType, convert: bool) -> Result<Value, Value> {
    match (target, value) {
        (SchemaType::Null, v @ Value::Null) => Ok(v),
        (SchemaType::Boolean, v @ Value::Bool(_)) => Ok(v),
        (SchemaType::Number, v @ Value::Number(_)) => Ok(v),
        (SchemaType::Integer, Value::Number(n)) if is_whole(&n) => Ok(Value::Number(n)),
        (SchemaType::String, v @ Value::String(_)) => Ok(v),
        (SchemaType::Array, v @ Value::Array(_)) => Ok(v),
        (SchemaType::Object, v @ Value::Object(_)) => Ok(v),
        (_, v) if !convert => Err(v),
        (SchemaType::Number, v) => to_number(v, false),
        (SchemaType::Integer, v) => to_number(v, true),
        (SchemaType::Boolean, v) => to_boolean(v),
        (SchemaType::String, v) => to_string(v),
        (SchemaType::Null | SchemaType::Array | SchemaType::Object, v) => Err(v),
    }
}

fn to_number(value: Value, integer: bool) -> Result<Value, Value> {
    let parsed = match &value {
        Value::Bool(b) => Some(Number::from(u8::from(*b))),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    match parsed {
        Some(n) if !integer => Ok(Value::Number(n)),
        Some(n) if is_whole(&n) => Ok(Value::Number(as_integer(n))),
        _ => Err(value),
    }
}

fn to_boolean(value: Value) -> Result<Value, Value> {
    let converted = match &value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => Some(false),
            Some(f) if f == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    };
    converted.map(Value::Bool).ok_or(value)
}

fn to_string(value: Value) -> Result<Value, Value> {
    match value {
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        Value::Number(n) => Ok(Value::String(number_text(&n))),
        other => Err(other),
    }
}

/// Parse numeric text. Integral text yields an integer, anything else a float.
///
/// Unsigned `0x`, `0o` and `0b` literals are read in their radix.
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some((radix, digits)) = radix_literal(text) {
        if digits.is_empty() || digits.starts_with('+') {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(Number::from);
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(Number::from(u));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn radix_literal(text: &str) -> Option<(u32, &str)> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

/// Re-express a whole float as an integer when it fits.
fn as_integer(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

/// Shortest decimal text for a number. Whole floats print without a fraction.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Structural equality that compares numbers by value, so `1 == 1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    x.as_f64() == y.as_f64()
}

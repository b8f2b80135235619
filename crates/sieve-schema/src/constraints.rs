//! # Constraint Checks
//!
//! Keyword checks applied after type resolution. Each function inspects one
//! family of keywords and fails at the given path with the first violation
//! it finds. Keywords a node does not declare are not checked.

use serde_json::{Map, Number, Value};

use crate::coerce::values_equal;
use crate::error::{ValidationError, Violation};
use crate::path::JsonPath;
use crate::schema::{ExclusiveBound, SchemaNode};

/// Relative tolerance for `multipleOf` on non-integral operands.
const MULTIPLE_OF_TOLERANCE: f64 = 1e-9;

fn fail(path: &JsonPath, violation: Violation) -> Result<(), ValidationError> {
    Err(ValidationError::new(path.clone(), violation))
}

/// `minimum`, `maximum`, `exclusiveMinimum`, `exclusiveMaximum`, `multipleOf`.
pub fn check_number(schema: &SchemaNode, n: &Number, path: &JsonPath) -> Result<(), ValidationError> {
    let Some(x) = n.as_f64() else {
        return Ok(());
    };

    if let Some(min) = schema.minimum {
        if schema.exclusive_minimum == Some(ExclusiveBound::Flag(true)) {
            if x <= min {
                return fail(path, Violation::NotAboveExclusiveMinimum(min));
            }
        } else if x < min {
            return fail(path, Violation::BelowMinimum(min));
        }
    }
    if let Some(ExclusiveBound::Value(bound)) = schema.exclusive_minimum {
        if x <= bound {
            return fail(path, Violation::NotAboveExclusiveMinimum(bound));
        }
    }

    if let Some(max) = schema.maximum {
        if schema.exclusive_maximum == Some(ExclusiveBound::Flag(true)) {
            if x >= max {
                return fail(path, Violation::NotBelowExclusiveMaximum(max));
            }
        } else if x > max {
            return fail(path, Violation::AboveMaximum(max));
        }
    }
    if let Some(ExclusiveBound::Value(bound)) = schema.exclusive_maximum {
        if x >= bound {
            return fail(path, Violation::NotBelowExclusiveMaximum(bound));
        }
    }

    if let Some(divisor) = schema.multiple_of.filter(|d| *d > 0.0) {
        if !is_multiple_of(n, x, divisor) {
            return fail(path, Violation::NotMultipleOf(divisor));
        }
    }

    Ok(())
}

fn is_multiple_of(n: &Number, x: f64, divisor: f64) -> bool {
    if divisor.fract() == 0.0 && divisor < u64::MAX as f64 {
        let whole = divisor as u64;
        if let Some(i) = n.as_i64() {
            return i.unsigned_abs() % whole == 0;
        }
        if let Some(u) = n.as_u64() {
            return u % whole == 0;
        }
    }
    let quotient = x / divisor;
    (quotient - quotient.round()).abs() <= MULTIPLE_OF_TOLERANCE * quotient.abs().max(1.0)
}

/// `minLength`, `maxLength` (counted in characters) and `pattern`.
pub fn check_string(schema: &SchemaNode, s: &str, path: &JsonPath) -> Result<(), ValidationError> {
    if schema.min_length.is_some() || schema.max_length.is_some() {
        let len = s.chars().count();
        if let Some(min) = schema.min_length.filter(|min| len < *min) {
            return fail(path, Violation::StringTooShort(min));
        }
        if let Some(max) = schema.max_length.filter(|max| len > *max) {
            return fail(path, Violation::StringTooLong(max));
        }
    }
    if let Some(pattern) = &schema.pattern {
        if !pattern.is_match(s) {
            return fail(path, Violation::PatternMismatch(pattern.as_str().to_string()));
        }
    }
    Ok(())
}

/// `minItems`. `maxItems` is enforced element by element during recursion.
pub fn check_min_items(schema: &SchemaNode, len: usize, path: &JsonPath) -> Result<(), ValidationError> {
    match schema.min_items {
        Some(min) if len < min => fail(path, Violation::ArrayTooShort(min)),
        _ => Ok(()),
    }
}

/// `uniqueItems`, using numeric-aware equality.
pub fn check_unique(schema: &SchemaNode, items: &[Value], path: &JsonPath) -> Result<(), ValidationError> {
    if !schema.unique_items {
        return Ok(());
    }
    for (i, a) in items.iter().enumerate() {
        if items[i + 1..].iter().any(|b| values_equal(a, b)) {
            return fail(path, Violation::DuplicateItems);
        }
    }
    Ok(())
}

/// `minProperties`, `maxProperties` and, unless ignored, `required`.
///
/// A missing required key fails at the path of that key.
pub fn check_object(
    schema: &SchemaNode,
    map: &Map<String, Value>,
    ignore_required: bool,
    path: &JsonPath,
) -> Result<(), ValidationError> {
    if let Some(min) = schema.min_properties.filter(|min| map.len() < *min) {
        return fail(path, Violation::TooFewProperties(min));
    }
    if let Some(max) = schema.max_properties.filter(|max| map.len() > *max) {
        return fail(path, Violation::TooManyProperties(max));
    }
    if !ignore_required {
        if let Some(missing) = schema.required.iter().find(|key| !map.contains_key(key.as_str())) {
            return fail(&path.key(missing), Violation::MissingRequired(missing.clone()));
        }
    }
    Ok(())
}

/// `enum`: the value must equal one of the listed literals.
pub fn check_enum(schema: &SchemaNode, value: &Value, path: &JsonPath) -> Result<(), ValidationError> {
    match &schema.enumeration {
        Some(allowed) if !allowed.iter().any(|candidate| values_equal(candidate, value)) => {
            fail(path, Violation::NotInEnum)
        }
        _ => Ok(()),
    }
}

//! # Validation Errors
//!
//! A single located error kind, [`ValidationError`], carries the offending
//! path and the concrete [`Violation`]. Any violation anywhere in a document
//! aborts the whole filter call; no partial result is returned alongside it.

use thiserror::Error;

use crate::coerce::ValueKind;
use crate::path::JsonPath;
use crate::schema::TypeSet;

/// A document failed to conform to its schema.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid data for schema: {violation} at path {path}")]
pub struct ValidationError {
    /// Location of the offending node.
    pub path: JsonPath,
    /// What was wrong with it.
    pub violation: Violation,
}

impl ValidationError {
    pub fn new(path: JsonPath, violation: Violation) -> Self {
        Self { path, violation }
    }

    /// Human-readable cause without the location.
    pub fn message(&self) -> String {
        self.violation.to_string()
    }
}

/// The concrete cause of a [`ValidationError`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    /// The governing schema is `false`.
    #[error("schema does not permit any value here")]
    Forbidden,

    /// No declared type accepted the value, even with coercion if enabled.
    #[error("expected {expected} but found {found}")]
    TypeMismatch {
        /// Types declared by the schema.
        expected: TypeSet,
        /// Runtime type of the value.
        found: ValueKind,
    },

    #[error("value must match one of the enum values")]
    NotInEnum,

    #[error("value must not be less than the minimum value {0}")]
    BelowMinimum(f64),

    #[error("value must not be greater than the maximum value {0}")]
    AboveMaximum(f64),

    #[error("value must be greater than the exclusive minimum value {0}")]
    NotAboveExclusiveMinimum(f64),

    #[error("value must be less than the exclusive maximum value {0}")]
    NotBelowExclusiveMaximum(f64),

    #[error("value must be a multiple of {0}")]
    NotMultipleOf(f64),

    #[error("string shorter than {0} characters")]
    StringTooShort(usize),

    #[error("string longer than {0} characters")]
    StringTooLong(usize),

    #[error("value must match the regular expression {0:?}")]
    PatternMismatch(String),

    #[error("array shorter than {0}")]
    ArrayTooShort(usize),

    #[error("array longer than {0}")]
    ArrayTooLong(usize),

    #[error("array item outside of schema items and additionalItems is false")]
    AdditionalItem,

    #[error("array items must be unique")]
    DuplicateItems,

    #[error("object has fewer than {0} properties")]
    TooFewProperties(usize),

    #[error("object has more than {0} properties")]
    TooManyProperties(usize),

    #[error("required object property {0} missing")]
    MissingRequired(String),

    #[error("object property not in schema properties and additionalProperties is false")]
    AdditionalProperty,
}

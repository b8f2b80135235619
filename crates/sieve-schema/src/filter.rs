//! # Recursive Filter Engine
//!
//! Walks a document top-down against a schema and produces a new document
//! plus the list of elements dropped under a permissive policy.
//!
//! ## Per-Node Outcome
//!
//! Every node ends in exactly one of: kept verbatim, kept as a coerced
//! value, recursively transformed, dropped and recorded, or a
//! [`ValidationError`] that aborts the whole call. A failure discards any
//! work done so far; there is no partial result.
//!
//! ## Type Resolution
//!
//! A node's declared types are tried in declaration order; the first one the
//! value satisfies (natively, or after conversion when `convertPrimitives` is
//! set) selects the handler. A node without `type` passes primitives through
//! verbatim but still handles arrays and objects: their structural keywords,
//! `items` / `properties` and the drop policies all apply. `enum` applies to
//! the final value of every node.
//!
//! ## Concurrency
//!
//! A [`Filter`] is immutable after construction and `Send + Sync`. Drop
//! records accumulate in a collection local to each [`Filter::apply`] call,
//! so one filter may serve concurrent callers.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::coerce::{self, ValueKind};
use crate::constraints;
use crate::error::{ValidationError, Violation};
use crate::options::FilterOptions;
use crate::path::JsonPath;
use crate::resolve;
use crate::schema::{SchemaNode, SubSchema};

/// Why an element was removed from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Array element governed by a `false` schema.
    AdditionalItem,
    /// Array element at or past `maxItems`.
    BeyondMaxItems { index: usize, max_items: usize },
    /// Object property governed by a `false` schema.
    AdditionalProperty,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdditionalItem => {
                f.write_str("Array item outside of schema items and additionalItems is false")
            }
            Self::BeyondMaxItems { index, max_items } => write!(
                f,
                "Array item index {index} outside of schema maxItems {max_items}"
            ),
            Self::AdditionalProperty => f.write_str(
                "Object property not in schema properties and additionalProperties is false",
            ),
        }
    }
}

impl Serialize for DropReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An element removed from the output, with its location in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropRecord {
    pub path: JsonPath,
    pub reason: DropReason,
}

/// Output of one successful filter call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filtered {
    /// The transformed document.
    pub result: Value,
    /// Elements removed under a permissive policy, in traversal order.
    pub dropped: Vec<DropRecord>,
}

/// A node after type resolution: one variant per runtime type, plus
/// `Untyped` for primitives under a node that declares no `type`.
enum Typed {
    Untyped(Value),
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl From<Value> for Typed {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => Self::Object(map),
        }
    }
}

/// A schema and policy bound together, reusable across documents.
#[derive(Debug, Clone)]
pub struct Filter {
    schema: SubSchema,
    options: FilterOptions,
}

impl Filter {
    /// Bind a schema and options. Nothing about the schema is validated here.
    pub fn new(schema: impl Into<SubSchema>, options: FilterOptions) -> Self {
        Self {
            schema: schema.into(),
            options,
        }
    }

    /// Filter one document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] located at the first node that violates
    /// its schema under the configured policy.
    pub fn apply(&self, data: Value) -> Result<Filtered, ValidationError> {
        let root = JsonPath::root();
        let mut dropped = Vec::new();
        tracing::debug!(options = ?self.options, "filtering document");

        let result = match &self.schema {
            SubSchema::Permit => data,
            SubSchema::Forbid => return Err(ValidationError::new(root, Violation::Forbidden)),
            SubSchema::Schema(node) => self.visit(data, node, &root, &mut dropped)?,
        };

        tracing::debug!(dropped = dropped.len(), "filtered document");
        Ok(Filtered { result, dropped })
    }

    /// Turn this filter into a plain function over documents.
    pub fn into_fn(self) -> impl Fn(Value) -> Result<Filtered, ValidationError> + Send + Sync {
        move |data| self.apply(data)
    }

    fn visit(
        &self,
        value: Value,
        schema: &SchemaNode,
        path: &JsonPath,
        dropped: &mut Vec<DropRecord>,
    ) -> Result<Value, ValidationError> {
        let output = match self.resolve_type(value, schema, path)? {
            Typed::Untyped(value) => value,
            Typed::Null => Value::Null,
            Typed::Boolean(b) => Value::Bool(b),
            Typed::Number(n) => Value::Number(self.visit_number(n, schema, path)?),
            Typed::String(s) => Value::String(self.visit_string(s, schema, path)?),
            Typed::Array(items) => Value::Array(self.visit_array(items, schema, path, dropped)?),
            Typed::Object(map) => Value::Object(self.visit_object(map, schema, path, dropped)?),
        };
        constraints::check_enum(schema, &output, path)?;
        Ok(output)
    }

    fn resolve_type(
        &self,
        value: Value,
        schema: &SchemaNode,
        path: &JsonPath,
    ) -> Result<Typed, ValidationError> {
        let Some(types) = &schema.types else {
            return Ok(match value {
                Value::Array(items) => Typed::Array(items),
                Value::Object(map) => Typed::Object(map),
                primitive => Typed::Untyped(primitive),
            });
        };

        let found = ValueKind::of(&value);
        let mut candidate = value;
        for ty in types.iter() {
            match coerce::coerce(candidate, ty, self.options.convert_primitives) {
                Ok(accepted) => {
                    if ValueKind::of(&accepted) != found {
                        tracing::trace!(%path, from = %found, to = %ty, "converted value");
                    }
                    return Ok(Typed::from(accepted));
                }
                Err(rejected) => candidate = rejected,
            }
        }

        Err(ValidationError::new(
            path.clone(),
            Violation::TypeMismatch {
                expected: types.clone(),
                found,
            },
        ))
    }

    fn visit_number(&self, n: Number, schema: &SchemaNode, path: &JsonPath) -> Result<Number, ValidationError> {
        constraints::check_number(schema, &n, path)?;
        Ok(n)
    }

    fn visit_string(&self, s: String, schema: &SchemaNode, path: &JsonPath) -> Result<String, ValidationError> {
        constraints::check_string(schema, &s, path)?;
        Ok(s)
    }

    fn visit_array(
        &self,
        items: Vec<Value>,
        schema: &SchemaNode,
        path: &JsonPath,
        dropped: &mut Vec<DropRecord>,
    ) -> Result<Vec<Value>, ValidationError> {
        constraints::check_min_items(schema, items.len(), path)?;

        let max_items = schema.max_items.unwrap_or(usize::MAX);
        let mut result = Vec::with_capacity(items.len().min(max_items));

        for (index, item) in items.into_iter().enumerate() {
            let item_path = path.index(index);
            match resolve::item_schema(schema, index) {
                SubSchema::Forbid => {
                    if !self.options.remove_additional_items {
                        return Err(ValidationError::new(item_path, Violation::AdditionalItem));
                    }
                    record_drop(dropped, item_path, DropReason::AdditionalItem);
                }
                _ if index >= max_items => {
                    if !self.options.crop_arrays {
                        return Err(ValidationError::new(
                            path.clone(),
                            Violation::ArrayTooLong(max_items),
                        ));
                    }
                    record_drop(dropped, item_path, DropReason::BeyondMaxItems { index, max_items });
                }
                SubSchema::Permit => result.push(item),
                SubSchema::Schema(node) => result.push(self.visit(item, node, &item_path, dropped)?),
            }
        }

        constraints::check_unique(schema, &result, path)?;
        Ok(result)
    }

    fn visit_object(
        &self,
        map: Map<String, Value>,
        schema: &SchemaNode,
        path: &JsonPath,
        dropped: &mut Vec<DropRecord>,
    ) -> Result<Map<String, Value>, ValidationError> {
        constraints::check_object(schema, &map, self.options.ignore_required_properties, path)?;

        let mut result = Map::new();
        for (key, value) in map {
            let property_path = path.key(&key);
            match resolve::property_schema(schema, &key) {
                SubSchema::Forbid => {
                    if !self.options.remove_additional_properties {
                        return Err(ValidationError::new(property_path, Violation::AdditionalProperty));
                    }
                    record_drop(dropped, property_path, DropReason::AdditionalProperty);
                }
                SubSchema::Permit => {
                    result.insert(key, value);
                }
                SubSchema::Schema(node) => {
                    let filtered = self.visit(value, node, &property_path, dropped)?;
                    result.insert(key, filtered);
                }
            }
        }
        Ok(result)
    }
}

fn record_drop(dropped: &mut Vec<DropRecord>, path: JsonPath, reason: DropReason) {
    tracing::debug!(%path, %reason, "dropped element");
    dropped.push(DropRecord { path, reason });
}

/// Bind `schema` and `options` into a reusable function over documents.
///
/// Each call walks one document from `$` and returns the transformed
/// document with its drop records, or the first [`ValidationError`].
pub fn filter(
    schema: impl Into<SubSchema>,
    options: FilterOptions,
) -> impl Fn(Value) -> Result<Filtered, ValidationError> + Send + Sync {
    Filter::new(schema, options).into_fn()
}

//! # Schema Model
//!
//! Typed representation of the schema language accepted by the filter
//! engine: a JSON-Schema-like subset with `type`, `enum`, numeric, string,
//! array and object keywords.
//!
//! ## Boolean-or-Schema Fields
//!
//! `items` entries, `additionalItems`, `properties` values and
//! `additionalProperties` may be a schema object or a bare boolean. They load
//! into [`SubSchema`], a three-way variant resolved once at load time:
//!
//! - `true` → [`SubSchema::Permit`] (any value is accepted as-is)
//! - `false` → [`SubSchema::Forbid`] (no value is accepted)
//! - `{...}` → [`SubSchema::Schema`]
//!
//! ## Loading
//!
//! Schemas deserialize with `serde` from any self-describing format. Unknown
//! keywords (`title`, `description`, `$schema`, `oneOf`, ...) are ignored;
//! they carry no meaning for the engine. `pattern` is compiled when the
//! schema loads, so an invalid regular expression is a load error rather than
//! a filtering error.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Error loading a schema definition.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema value does not have the expected shape.
    #[error("malformed schema: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A type name usable in a schema's `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl SchemaType {
    /// The keyword spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The non-empty, ordered list of types declared by a schema node.
///
/// Declaration order matters: the engine tries each type left to right and
/// selects the first one the value satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTypeSet")]
pub struct TypeSet(Vec<SchemaType>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTypeSet {
    One(SchemaType),
    Many(Vec<SchemaType>),
}

impl TryFrom<RawTypeSet> for TypeSet {
    type Error = String;

    fn try_from(raw: RawTypeSet) -> Result<Self, Self::Error> {
        match raw {
            RawTypeSet::One(ty) => Ok(Self(vec![ty])),
            RawTypeSet::Many(types) if types.is_empty() => {
                Err("`type` must name at least one type".to_string())
            }
            RawTypeSet::Many(types) => Ok(Self(types)),
        }
    }
}

impl TypeSet {
    /// Build a type set from a non-empty list. Returns `None` for an empty list.
    pub fn new(types: Vec<SchemaType>) -> Option<Self> {
        (!types.is_empty()).then_some(Self(types))
    }

    /// Iterate declared types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SchemaType> + '_ {
        self.0.iter().copied()
    }
}

impl From<SchemaType> for TypeSet {
    fn from(ty: SchemaType) -> Self {
        Self(vec![ty])
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

/// A compiled `pattern` keyword.
///
/// Matching is an unanchored search: the pattern must match somewhere in the
/// string, not necessarily the whole of it.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    /// The source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source)
            .map_err(|e| de::Error::custom(format!("invalid pattern {source:?}: {e}")))
    }
}

/// An `exclusiveMinimum` / `exclusiveMaximum` keyword.
///
/// Draft 4 schemas use a boolean that turns `minimum` / `maximum` exclusive;
/// later drafts give the exclusive bound directly as a number.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(f64),
}

/// A boolean-or-schema position, normalized at load time.
#[derive(Debug, Clone, Default)]
pub enum SubSchema {
    /// `true`: any value is accepted unchanged.
    #[default]
    Permit,
    /// `false`: no value is accepted.
    Forbid,
    /// A schema node governing the value.
    Schema(Box<SchemaNode>),
}

impl SubSchema {
    /// Load a sub-schema (boolean or object) from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_forbid(&self) -> bool {
        matches!(self, Self::Forbid)
    }
}

impl From<SchemaNode> for SubSchema {
    fn from(node: SchemaNode) -> Self {
        Self::Schema(Box::new(node))
    }
}

impl From<bool> for SubSchema {
    fn from(permit: bool) -> Self {
        if permit {
            Self::Permit
        } else {
            Self::Forbid
        }
    }
}

struct SubSchemaVisitor;

impl<'de> Visitor<'de> for SubSchemaVisitor {
    type Value = SubSchema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean or a schema object")
    }

    fn visit_bool<E: de::Error>(self, permit: bool) -> Result<SubSchema, E> {
        Ok(SubSchema::from(permit))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<SubSchema, A::Error> {
        let node = SchemaNode::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(SubSchema::from(node))
    }
}

impl<'de> Deserialize<'de> for SubSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SubSchemaVisitor)
    }
}

/// The `items` keyword.
#[derive(Debug, Clone)]
pub enum Items {
    /// A single sub-schema applied to every element.
    Uniform(SubSchema),
    /// Positional sub-schemas; elements past the end fall to `additionalItems`.
    Positional(Vec<SubSchema>),
}

struct ItemsVisitor;

impl<'de> Visitor<'de> for ItemsVisitor {
    type Value = Items;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, a schema object, or a list of schemas")
    }

    fn visit_bool<E: de::Error>(self, permit: bool) -> Result<Items, E> {
        Ok(Items::Uniform(SubSchema::from(permit)))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Items, A::Error> {
        SubSchemaVisitor.visit_map(map).map(Items::Uniform)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Items, A::Error> {
        let mut positional = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(sub) = seq.next_element::<SubSchema>()? {
            positional.push(sub);
        }
        Ok(Items::Positional(positional))
    }
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ItemsVisitor)
    }
}

/// One node of a schema tree.
///
/// Every keyword is optional. An all-default node accepts any value, which
/// is also what the boolean schema `true` means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Declared types; `None` means no type restriction.
    #[serde(rename = "type")]
    pub types: Option<TypeSet>,
    /// Literal values the (possibly coerced) value must equal.
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<Value>>,

    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<ExclusiveBound>,
    pub exclusive_maximum: Option<ExclusiveBound>,
    pub multiple_of: Option<f64>,

    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,

    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    #[serde(default)]
    pub unique_items: bool,
    pub items: Option<Items>,
    pub additional_items: Option<SubSchema>,

    pub properties: Option<BTreeMap<String, SubSchema>>,
    pub additional_properties: Option<SubSchema>,
    #[serde(default)]
    pub required: Vec<String>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl SchemaNode {
    /// A node with no keywords. Accepts anything.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Load a schema object from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Malformed` if a keyword has the wrong shape, a
    /// type name is unknown, or a `pattern` does not compile.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }
}

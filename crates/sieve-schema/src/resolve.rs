//! # Schema Node Resolver
//!
//! Determines the sub-schema that governs a child of an array or object.
//! Absent keywords default to [`SubSchema::Permit`], so a schema that says
//! nothing about a child accepts it as-is.

use crate::schema::{Items, SchemaNode, SubSchema};

static PERMIT: SubSchema = SubSchema::Permit;

/// Sub-schema governing the array element at `index`.
///
/// A uniform `items` applies to every index. Positional `items` cover their
/// own length; indices past the end fall to `additionalItems`.
pub fn item_schema(schema: &SchemaNode, index: usize) -> &SubSchema {
    match &schema.items {
        None => &PERMIT,
        Some(Items::Uniform(sub)) => sub,
        Some(Items::Positional(positional)) => positional
            .get(index)
            .unwrap_or_else(|| schema.additional_items.as_ref().unwrap_or(&PERMIT)),
    }
}

/// Sub-schema governing the object property `key`.
///
/// Keys listed in `properties` use their own schema, all others fall to
/// `additionalProperties`.
pub fn property_schema<'a>(schema: &'a SchemaNode, key: &str) -> &'a SubSchema {
    schema
        .properties
        .as_ref()
        .and_then(|properties| properties.get(key))
        .or(schema.additional_properties.as_ref())
        .unwrap_or(&PERMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SchemaNode {
        SchemaNode::from_value(value).unwrap()
    }

    #[test]
    fn missing_items_permits_every_index() {
        let schema = node(json!({"type": "array"}));
        assert!(matches!(item_schema(&schema, 0), SubSchema::Permit));
        assert!(matches!(item_schema(&schema, 99), SubSchema::Permit));
    }

    #[test]
    fn uniform_items_ignore_index_and_additional_items() {
        let schema = node(json!({"items": {"type": "string"}, "additionalItems": false}));
        assert!(matches!(item_schema(&schema, 0), SubSchema::Schema(_)));
        assert!(matches!(item_schema(&schema, 50), SubSchema::Schema(_)));
    }

    #[test]
    fn positional_items_fall_back_to_additional_items() {
        let schema = node(json!({
            "items": [{"type": "string"}, true],
            "additionalItems": false
        }));
        assert!(matches!(item_schema(&schema, 0), SubSchema::Schema(_)));
        assert!(matches!(item_schema(&schema, 1), SubSchema::Permit));
        assert!(item_schema(&schema, 2).is_forbid());
    }

    #[test]
    fn positional_items_default_additional_items_permits() {
        let schema = node(json!({"items": [{"type": "string"}]}));
        assert!(matches!(item_schema(&schema, 3), SubSchema::Permit));
    }

    #[test]
    fn listed_property_wins_over_additional_properties() {
        let schema = node(json!({
            "properties": {"name": {"type": "string"}},
            "additionalProperties": false
        }));
        assert!(matches!(property_schema(&schema, "name"), SubSchema::Schema(_)));
        assert!(property_schema(&schema, "other").is_forbid());
    }

    #[test]
    fn unlisted_property_defaults_to_permit() {
        let schema = node(json!({"properties": {"name": {"type": "string"}}}));
        assert!(matches!(property_schema(&schema, "other"), SubSchema::Permit));

        let schema = node(json!({}));
        assert!(matches!(property_schema(&schema, "anything"), SubSchema::Permit));
    }

    #[test]
    fn additional_properties_schema_applies_to_unlisted_keys() {
        let schema = node(json!({"additionalProperties": {"type": "integer"}}));
        assert!(matches!(property_schema(&schema, "x"), SubSchema::Schema(_)));
    }
}

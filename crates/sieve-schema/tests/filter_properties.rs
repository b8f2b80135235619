//! End-to-end behavior of the filter engine: identity on conforming input,
//! drop completeness, required keys, cropping, the conversion gate, and
//! sharing one filter across threads.

use proptest::prelude::*;
use serde_json::{json, Value};
use sieve_schema::{filter, Filter, FilterOptions, JsonPath, SchemaNode, SubSchema, Violation};

fn schema(value: Value) -> SchemaNode {
    SchemaNode::from_value(value).expect("schema should load")
}

fn order_schema() -> SchemaNode {
    schema(json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["foo", "bar"],
        "properties": {
            "foo": {"type": "string", "enum": ["FOO", "BAR"]},
            "bar": {"type": "number"},
            "baz": {"type": "integer"},
            "qux": {
                "type": "array",
                "items": {"type": "object", "properties": {"foo": {"type": "string"}}}
            }
        }
    }))
}

fn order_options() -> FilterOptions {
    FilterOptions {
        remove_additional_properties: true,
        convert_primitives: true,
        ..FilterOptions::default()
    }
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn enum_violation_aborts_the_call() {
    let f = filter(order_schema(), order_options());
    let err = f(json!({"foo": "hello", "bar": 42, "baz": "43", "extra": "x"})).unwrap_err();
    assert_eq!(err.path, "$.foo");
    assert_eq!(err.violation, Violation::NotInEnum);
}

#[test]
fn conforming_enum_value_yields_converted_and_pruned_result() {
    let f = filter(order_schema(), order_options());
    let out = f(json!({"foo": "FOO", "bar": 42, "baz": "43", "extra": "x"})).unwrap();
    assert_eq!(out.result, json!({"foo": "FOO", "bar": 42, "baz": 43}));
    assert_eq!(out.dropped.len(), 1);
    assert_eq!(out.dropped[0].path, "$.extra");
    assert!(!out.dropped[0].reason.to_string().is_empty());
}

// ---------------------------------------------------------------------------
// Required keys
// ---------------------------------------------------------------------------

#[test]
fn missing_required_key_fails_unless_ignored() {
    let s = schema(json!({"type": "object", "required": ["a", "b"]}));

    for input in [json!({"a": 1}), json!({"b": 1}), json!({})] {
        let err = Filter::new(s.clone(), FilterOptions::default())
            .apply(input.clone())
            .unwrap_err();
        assert!(matches!(err.violation, Violation::MissingRequired(_)), "{err}");

        let lenient = FilterOptions {
            ignore_required_properties: true,
            ..FilterOptions::default()
        };
        let out = Filter::new(s.clone(), lenient).apply(input.clone()).unwrap();
        assert_eq!(out.result, input);
    }
}

// ---------------------------------------------------------------------------
// Cropping
// ---------------------------------------------------------------------------

#[test]
fn crop_keeps_max_items_and_records_the_rest() {
    let opts = FilterOptions {
        crop_arrays: true,
        ..FilterOptions::default()
    };
    let out = Filter::new(schema(json!({"type": "array", "maxItems": 2})), opts)
        .apply(json!(["a", "b", "c", "d", "e"]))
        .unwrap();
    assert_eq!(out.result, json!(["a", "b"]));
    let paths: Vec<String> = out.dropped.iter().map(|d| d.path.to_string()).collect();
    assert_eq!(paths, ["$[2]", "$[3]", "$[4]"]);
}

// ---------------------------------------------------------------------------
// Conversion gate
// ---------------------------------------------------------------------------

#[test]
fn string_to_integer_requires_convert_primitives() {
    let s = schema(json!({"type": "integer"}));

    let err = Filter::new(s.clone(), FilterOptions::default())
        .apply(json!("43"))
        .unwrap_err();
    assert_eq!(err.path, "$");
    assert!(matches!(err.violation, Violation::TypeMismatch { .. }));

    let opts = FilterOptions {
        convert_primitives: true,
        ..FilterOptions::default()
    };
    let out = Filter::new(s, opts).apply(json!("43")).unwrap();
    assert_eq!(out.result, json!(43));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn one_filter_serves_concurrent_callers() {
    let opts = FilterOptions {
        crop_arrays: true,
        ..FilterOptions::default()
    };
    let f = filter(schema(json!({"type": "array", "maxItems": 1})), opts);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4usize)
            .map(|n| {
                let f = &f;
                scope.spawn(move || f(Value::Array(vec![json!(0); n + 1])).unwrap())
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let out = handle.join().unwrap();
            assert_eq!(out.result, json!([0]));
            assert_eq!(out.dropped.len(), n);
        }
    });
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..8)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Number of direct children of a composite value.
fn top_level_children(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

proptest! {
    /// A document run through a schema that permits everything comes back
    /// unchanged with no drops.
    #[test]
    fn permissive_schema_is_identity(value in json_value()) {
        for root in [SubSchema::Permit, SubSchema::from(SchemaNode::permissive())] {
            let out = Filter::new(root, FilterOptions::default()).apply(value.clone()).unwrap();
            prop_assert_eq!(&out.result, &value);
            prop_assert!(out.dropped.is_empty());
        }
    }

    /// Typing the root to its own runtime type is still an identity.
    #[test]
    fn self_typed_schema_is_identity(value in json_value()) {
        let kind = sieve_schema::ValueKind::of(&value).as_str();
        let s = schema(json!({"type": kind}));
        let out = Filter::new(s, FilterOptions::default()).apply(value.clone()).unwrap();
        prop_assert_eq!(out.result, value);
    }

    /// With `additionalProperties: false` and removal enabled, every input key
    /// is either kept or dropped exactly once under the parent's path.
    #[test]
    fn dropped_properties_are_accounted_for(
        map in prop::collection::btree_map("[a-e]{1,2}", any::<i64>(), 0..10)
    ) {
        let s = schema(json!({
            "type": "object",
            "properties": {"a": true, "b": {"type": "integer"}},
            "additionalProperties": false
        }));
        let opts = FilterOptions { remove_additional_properties: true, ..FilterOptions::default() };
        let input = Value::Object(map.iter().map(|(k, v)| (k.clone(), json!(v))).collect());
        let out = Filter::new(s, opts).apply(input.clone()).unwrap();

        let kept = top_level_children(&out.result);
        prop_assert_eq!(kept + out.dropped.len(), top_level_children(&input));
        let root = JsonPath::root();
        for record in &out.dropped {
            prop_assert!(record.path.is_within(&root));
            let key = record.path.as_str().trim_start_matches("$.");
            prop_assert!(input.get(key).is_some());
            prop_assert!(out.result.get(key).is_none());
        }
    }

    /// Cropping an array keeps a prefix and records one drop per removed index.
    #[test]
    fn cropped_arrays_are_accounted_for(
        items in prop::collection::vec(any::<i64>(), 0..20),
        max_items in 0usize..6,
    ) {
        let s = schema(json!({"type": "array", "maxItems": max_items}));
        let opts = FilterOptions { crop_arrays: true, ..FilterOptions::default() };
        let input = json!(items);
        let out = Filter::new(s, opts).apply(input).unwrap();

        let expected_len = items.len().min(max_items);
        prop_assert_eq!(out.result, json!(items[..expected_len]));
        prop_assert_eq!(out.dropped.len(), items.len() - expected_len);
        for (offset, record) in out.dropped.iter().enumerate() {
            prop_assert_eq!(record.path.to_string(), format!("$[{}]", expected_len + offset));
        }
    }
}

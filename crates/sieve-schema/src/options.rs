//! # Filter Options
//!
//! Policy switches controlling how the engine treats non-conforming input.
//! All default to `false` (strict). Field names serialize in camelCase so an
//! options file reads `{"cropArrays": true, "convertPrimitives": true}`.

use serde::{Deserialize, Serialize};

/// Policy for one filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FilterOptions {
    /// Truncate arrays longer than `maxItems` instead of failing.
    pub crop_arrays: bool,
    /// Drop array elements governed by a `false` schema instead of failing.
    pub remove_additional_items: bool,
    /// Drop object properties governed by a `false` schema instead of failing.
    pub remove_additional_properties: bool,
    /// Skip the `required` check.
    pub ignore_required_properties: bool,
    /// Allow lossy conversion among booleans, numbers and strings.
    pub convert_primitives: bool,
}

impl FilterOptions {
    /// Options with every policy switch enabled.
    pub fn lenient() -> Self {
        Self {
            crop_arrays: true,
            remove_additional_items: true,
            remove_additional_properties: true,
            ignore_required_properties: true,
            convert_primitives: true,
        }
    }

    /// Options enabling every switch set in either `self` or `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            crop_arrays: self.crop_arrays || other.crop_arrays,
            remove_additional_items: self.remove_additional_items || other.remove_additional_items,
            remove_additional_properties: self.remove_additional_properties
                || other.remove_additional_properties,
            ignore_required_properties: self.ignore_required_properties
                || other.ignore_required_properties,
            convert_primitives: self.convert_primitives || other.convert_primitives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_strict() {
        let opts = FilterOptions::default();
        assert!(!opts.crop_arrays);
        assert!(!opts.convert_primitives);
        assert_eq!(serde_json::from_value::<FilterOptions>(json!({})).unwrap(), opts);
    }

    #[test]
    fn deserializes_camel_case_names() {
        let opts: FilterOptions = serde_json::from_value(json!({
            "cropArrays": true,
            "removeAdditionalProperties": true
        }))
        .unwrap();
        assert!(opts.crop_arrays);
        assert!(opts.remove_additional_properties);
        assert!(!opts.remove_additional_items);
    }

    #[test]
    fn rejects_unknown_option() {
        let result = serde_json::from_value::<FilterOptions>(json!({"cropArray": true}));
        assert!(result.is_err());
    }

    #[test]
    fn union_ors_each_switch() {
        let a = FilterOptions {
            crop_arrays: true,
            ..FilterOptions::default()
        };
        let b = FilterOptions {
            convert_primitives: true,
            ..FilterOptions::default()
        };
        let merged = a.union(b);
        assert!(merged.crop_arrays && merged.convert_primitives);
        assert!(!merged.ignore_required_properties);
        assert_eq!(FilterOptions::default().union(FilterOptions::lenient()), FilterOptions::lenient());
    }
}

//! # Filter Configuration
//!
//! Filter options come from an optional options file (JSON or YAML, same
//! camelCase names as the library) with command-line switches OR-ed on top:
//! a flag can enable a policy the file leaves off, never disable one.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use sieve_schema::FilterOptions;

use crate::load::read_document;

/// Policy switches accepted on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionFlags {
    /// Truncate arrays longer than `maxItems` instead of failing.
    #[arg(long)]
    pub crop_arrays: bool,

    /// Drop array items governed by `false` instead of failing.
    #[arg(long)]
    pub remove_additional_items: bool,

    /// Drop object properties governed by `false` instead of failing.
    #[arg(long)]
    pub remove_additional_properties: bool,

    /// Skip `required` checks.
    #[arg(long)]
    pub ignore_required_properties: bool,

    /// Convert between booleans, numbers and strings to match declared types.
    #[arg(long)]
    pub convert_primitives: bool,
}

impl OptionFlags {
    pub fn to_options(&self) -> FilterOptions {
        FilterOptions {
            crop_arrays: self.crop_arrays,
            remove_additional_items: self.remove_additional_items,
            remove_additional_properties: self.remove_additional_properties,
            ignore_required_properties: self.ignore_required_properties,
            convert_primitives: self.convert_primitives,
        }
    }
}

/// Load an options file.
pub fn load_options(path: &Path) -> Result<FilterOptions> {
    let value = read_document(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("invalid filter options in {}", path.display()))
}

/// Combine an optional options file with command-line switches.
pub fn resolve_options(file: Option<&Path>, flags: &OptionFlags) -> Result<FilterOptions> {
    let from_file = match file {
        Some(path) => load_options(path)?,
        None => FilterOptions::default(),
    };
    let options = from_file.union(flags.to_options());
    tracing::debug!(?options, "resolved filter options");
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_uses_flags_only() {
        let flags = OptionFlags {
            crop_arrays: true,
            ..OptionFlags::default()
        };
        let options = resolve_options(None, &flags).unwrap();
        assert!(options.crop_arrays);
        assert!(!options.convert_primitives);
    }

    #[test]
    fn flags_add_to_file_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.yaml");
        std::fs::write(&path, "convertPrimitives: true\nremoveAdditionalItems: true\n").unwrap();

        let flags = OptionFlags {
            ignore_required_properties: true,
            ..OptionFlags::default()
        };
        let options = resolve_options(Some(path.as_path()), &flags).unwrap();
        assert!(options.convert_primitives);
        assert!(options.remove_additional_items);
        assert!(options.ignore_required_properties);
        assert!(!options.crop_arrays);
    }

    #[test]
    fn unknown_option_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"cropArray": true}"#).unwrap();
        let err = load_options(&path).unwrap_err();
        assert!(err.to_string().contains("invalid filter options"), "{err}");
    }
}

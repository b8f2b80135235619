//! # Document Loading
//!
//! Reads schemas, options files and input documents from disk or stdin.
//! Files ending in `.yaml` / `.yml` are parsed as YAML and converted to JSON
//! values; everything else is parsed as JSON.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

/// Syntax of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension. Unknown extensions are JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse document text in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).context("invalid JSON"),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content).context("invalid YAML")?;
            yaml_to_json(&yaml).context("YAML-to-JSON conversion failed")
        }
    }
}

/// Read and parse a document file.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let value = parse_document(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("cannot parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded document");
    Ok(value)
}

/// Read and parse a JSON document from any reader (typically stdin).
pub fn read_json(mut reader: impl Read) -> Result<Value> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("cannot read input")?;
    parse_document(&content, DocumentFormat::Json)
}

/// Convert a YAML value tree into the equivalent JSON value tree.
///
/// Tags are ignored and the tagged value converted in their place.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value> {
    use serde_yaml::Value as Yaml;

    let converted = match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Number(n) => Value::Number(yaml_number(n)?),
        Yaml::Sequence(items) => items.iter().map(yaml_to_json).collect::<Result<Vec<_>>>()?.into(),
        Yaml::Mapping(entries) => entries
            .iter()
            .map(|(k, v)| Ok((mapping_key(k)?, yaml_to_json(v)?)))
            .collect::<Result<serde_json::Map<_, _>>>()?
            .into(),
        Yaml::Tagged(tagged) => return yaml_to_json(&tagged.value),
    };
    Ok(converted)
}

/// Integers stay exact; floats must be finite to have a JSON form.
fn yaml_number(n: &serde_yaml::Number) -> Result<serde_json::Number> {
    if n.is_nan() || n.is_infinite() {
        bail!("YAML number {n} has no JSON representation");
    }
    match (n.as_u64(), n.as_i64()) {
        (Some(u), _) => Ok(u.into()),
        (None, Some(i)) => Ok(i.into()),
        (None, None) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .ok_or_else(|| anyhow!("unsupported YAML number {n}")),
    }
}

/// JSON object keys are strings; scalar YAML keys are written out as text.
fn mapping_key(key: &serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => mapping_key(&tagged.value),
        other => Err(anyhow!("YAML mapping key {other:?} is not a scalar")),
    }
}

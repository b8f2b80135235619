//! # Check-Schema Subcommand
//!
//! Loads a schema and reports whether the engine accepts its shape.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use sieve_schema::SubSchema;

use crate::filter::load_schema;

/// Arguments for the check-schema subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,
}

/// Execute the check-schema subcommand.
pub fn run_check_schema(args: &CheckSchemaArgs) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    println!("{}: {}", args.schema.display(), describe(&schema));
    Ok(0)
}

fn describe(schema: &SubSchema) -> String {
    match schema {
        SubSchema::Permit => "ok (accepts any document)".to_string(),
        SubSchema::Forbid => "ok (rejects every document)".to_string(),
        SubSchema::Schema(node) => match &node.types {
            Some(types) => format!("ok (root type: {types})"),
            None => "ok (untyped root)".to_string(),
        },
    }
}

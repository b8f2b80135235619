//! # Filter Subcommand
//!
//! `sieve filter --schema <file> [--options <file>] [flags] [<input>]`
//!
//! Prints `{"result": ..., "dropped": [...]}` to stdout. A document that
//! fails validation is reported on stderr and exits with status 1.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use sieve_schema::{Filter, SubSchema};

use crate::config::{resolve_options, OptionFlags};
use crate::load::{read_document, read_json};

/// Arguments for the filter subcommand.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Options file (JSON or YAML) with camelCase option names.
    #[arg(long)]
    pub options: Option<PathBuf>,

    #[command(flatten)]
    pub flags: OptionFlags,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// Input document. Reads JSON from stdin when omitted.
    pub input: Option<PathBuf>,
}

/// Load a schema file into a root sub-schema.
pub fn load_schema(path: &Path) -> Result<SubSchema> {
    let value = read_document(path)?;
    SubSchema::from_value(value).with_context(|| format!("invalid schema {}", path.display()))
}

/// Execute the filter subcommand against stdin/stdout.
pub fn run_filter(args: &FilterArgs) -> Result<u8> {
    let input = match &args.input {
        Some(path) => read_document(path)?,
        None => read_json(std::io::stdin().lock())?,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    filter_to(args, input, &mut out)
}

/// Filter `input` and write the outcome to `out`. Returns the exit status.
pub fn filter_to(args: &FilterArgs, input: Value, out: &mut impl Write) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let options = resolve_options(args.options.as_deref(), &args.flags)?;

    match Filter::new(schema, options).apply(input) {
        Ok(filtered) => {
            tracing::info!(dropped = filtered.dropped.len(), "document accepted");
            if args.pretty {
                serde_json::to_writer_pretty(&mut *out, &filtered)?;
            } else {
                serde_json::to_writer(&mut *out, &filtered)?;
            }
            writeln!(out)?;
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(path = %e.path, "document rejected");
            eprintln!("{e}");
            Ok(1)
        }
    }
}

//! # sieve-cli — Command-Line Front End for sieve-schema
//!
//! Thin I/O wrapper around the filter engine: loads a schema and options
//! from files, reads a document from a file or stdin, runs the filter, and
//! prints `{result, dropped}` as JSON.
//!
//! ## Subcommands
//!
//! - `sieve filter` — filter one document.
//! - `sieve check-schema` — verify that a schema file loads.
//!
//! ```bash
//! sieve filter --schema order.schema.yaml --remove-additional-properties order.json
//! cat order.json | sieve filter --schema order.schema.json --options strict.yaml --pretty
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; filtering semantics live in `sieve-schema`.
//! - Stdout carries only output documents. Logs go to stderr.

pub mod check;
pub mod config;
pub mod filter;
pub mod load;

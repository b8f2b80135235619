//! # sieve-schema — Schema-Driven Document Filtering
//!
//! Sanitizes untrusted tree-structured data (nulls, booleans, numbers,
//! strings, arrays, objects) against a declarative schema before it enters
//! a program. Non-conforming values are rejected or converted; out-of-schema
//! array elements and object properties are either rejected or dropped
//! according to policy, and every drop is reported.
//!
//! ## Entry Point
//!
//! ```
//! use serde_json::json;
//! use sieve_schema::{filter, FilterOptions, SchemaNode};
//!
//! let schema = SchemaNode::from_value(json!({
//!     "type": "object",
//!     "additionalProperties": false,
//!     "properties": {"id": {"type": "integer"}}
//! }))
//! .unwrap();
//! let options = FilterOptions {
//!     remove_additional_properties: true,
//!     convert_primitives: true,
//!     ..FilterOptions::default()
//! };
//!
//! let sanitize = filter(schema, options);
//! let out = sanitize(json!({"id": "7", "debug": true})).unwrap();
//! assert_eq!(out.result, json!({"id": 7}));
//! assert_eq!(out.dropped[0].path, "$.debug");
//! ```
//!
//! ## Modules
//!
//! - [`schema`] — schema node model and loading.
//! - [`resolve`] — which sub-schema governs an array element or property.
//! - [`filter`] — the recursive engine, drop records, [`Filter`].
//! - [`coerce`] — runtime types and primitive conversion.
//! - [`constraints`] — per-keyword checks.
//!
//! ## Crate Policy
//!
//! - No I/O. Loading schemas from files, printing and persisting results
//!   belong to callers (see `sieve-cli`).
//! - Schemas and options are never mutated by a filter call.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod constraints;
pub mod error;
pub mod filter;
pub mod options;
pub mod path;
pub mod resolve;
pub mod schema;

pub use coerce::ValueKind;
pub use error::{ValidationError, Violation};
pub use filter::{filter, DropReason, DropRecord, Filter, Filtered};
pub use options::FilterOptions;
pub use path::JsonPath;
pub use schema::{ExclusiveBound, Items, Pattern, SchemaError, SchemaNode, SchemaType, SubSchema, TypeSet};

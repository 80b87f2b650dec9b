//! # Schema Module
//!
//! A [`SchemaContract`] bundles up to four optional validators that govern one route:
//!
//! - `body` - the inbound request body
//! - `query` - the inbound query string
//! - `output` - a successful response body
//! - `error` - an unsuccessful response body
//!
//! The schema engine itself is opaque. Anything implementing [`Validator`] can be used:
//! a JSON Schema document ([`JsonSchemaValidator`]), a serde type ([`SerdeValidator`]),
//! or a plain closure.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use typedroute::schema::{JsonSchemaValidator, SchemaContract, Validator};
//!
//! let body = JsonSchemaValidator::new(&json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": { "name": { "type": "string", "minLength": 1 } }
//! }))
//! .unwrap();
//!
//! let contract = SchemaContract::new().body(body);
//! let issues = contract.body_validator().unwrap().parse(&json!({})).unwrap_err();
//! assert_eq!(issues.flatten().first_field_error().unwrap().0, "name");
//! ```

mod contract;
mod error;
mod issues;
mod validators;

pub use contract::SchemaContract;
pub use error::SchemaError;
pub use issues::{FlattenedIssues, SchemaIssue, SchemaIssues};
pub use validators::{JsonSchemaValidator, SerdeValidator, Validator};

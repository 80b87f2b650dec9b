//! # Pattern Module
//!
//! The pattern module parses, builds and matches bracket-style route patterns such as
//! `/api/[name]/hello/[id]` or `/docs/[[...slug]]`.
//!
//! ## Overview
//!
//! A pattern is an ordered list of [`Segment`]s:
//!
//! | Syntax          | Segment                       | Parameter value     |
//! |-----------------|-------------------------------|---------------------|
//! | `users`         | [`Segment::Literal`]          | -                   |
//! | `[id]`          | [`Segment::Dynamic`]          | one string          |
//! | `[...slug]`     | [`Segment::CatchAll`]         | one or more strings |
//! | `[[...slug]]`   | [`Segment::OptionalCatchAll`] | zero or more strings|
//!
//! A catch-all of either kind must be the final segment, and parameter names are unique
//! within a pattern.
//!
//! ## Example
//!
//! ```rust
//! use typedroute::pattern::{ParamMap, RoutePattern};
//!
//! let pattern = RoutePattern::parse("/files/[...slug]").unwrap();
//!
//! let mut params = ParamMap::new();
//! params.insert_many("slug", ["a", "b"]);
//! assert_eq!(pattern.build(&params).unwrap(), "/files/a/b");
//!
//! let matched = pattern.match_path("/files/a/b").unwrap();
//! assert_eq!(matched, params);
//! ```
//!
//! ## Normalization
//!
//! Both patterns and concrete paths are normalized before use: a single leading `/`,
//! no trailing `/`, and empty segments (`//`) are ignored. The root pattern is `/`.

mod core;
mod error;
mod params;
mod segment;

pub use core::{ParamDescriptor, ParamKind, ParamShape, RoutePattern, SEPARATOR};
pub use error::{BuildError, PatternError};
pub use params::{ParamMap, ParamValue};
pub use segment::{classify_segment, Segment};

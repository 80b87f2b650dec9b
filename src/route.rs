//! # Route Module
//!
//! A [`TypedRoute`] is one route definition: a parsed [`RoutePattern`] bound to the
//! [`SchemaContract`] that governs it. The server pipeline and the client builder both
//! take a `TypedRoute`, so handler and caller are checked against the same contract.
//!
//! ```rust
//! use serde_json::json;
//! use typedroute::route::TypedRoute;
//! use typedroute::schema::{JsonSchemaValidator, SchemaContract};
//!
//! let contract = SchemaContract::new()
//!     .output(JsonSchemaValidator::new(&json!({"type": "object"})).unwrap());
//! let route = TypedRoute::new("/api/projects/[id]", contract).unwrap();
//! assert_eq!(route.pattern().as_str(), "/api/projects/[id]");
//! ```

use std::sync::Arc;
use tracing::warn;

use crate::pattern::{PatternError, RoutePattern};
use crate::registry::RegistrySnapshot;
use crate::schema::SchemaContract;

/// A route pattern together with its schema contract.
#[derive(Debug, Clone)]
pub struct TypedRoute {
    pattern: Arc<RoutePattern>,
    contract: SchemaContract,
}

impl TypedRoute {
    /// Parse `pattern` and bind it to `contract`.
    ///
    /// # Errors
    ///
    /// Returns the [`PatternError`] if the pattern is malformed.
    pub fn new(pattern: &str, contract: SchemaContract) -> Result<Self, PatternError> {
        Ok(TypedRoute {
            pattern: Arc::new(RoutePattern::parse(pattern)?),
            contract,
        })
    }

    /// Bind an already parsed pattern.
    #[must_use]
    pub fn from_pattern(pattern: RoutePattern, contract: SchemaContract) -> Self {
        TypedRoute {
            pattern: Arc::new(pattern),
            contract,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    #[must_use]
    pub fn contract(&self) -> &SchemaContract {
        &self.contract
    }

    /// Whether the pattern is present in `snapshot`.
    ///
    /// Logs a warning when it is not, since the route has no file behind it.
    #[must_use]
    pub fn ensure_registered(&self, snapshot: &RegistrySnapshot) -> bool {
        let found = snapshot.contains(self.pattern.as_str());
        if !found {
            warn!(
                pattern = %self.pattern,
                registered = snapshot.len(),
                "route pattern is not present in the route registry"
            );
        }
        found
    }
}

use std::fmt;
use std::sync::Arc;

use super::validators::Validator;

/// Up to four optional validators governing one route.
///
/// Built once at the route definition site and shared read-only afterwards; cloning is
/// cheap because validators are reference counted.
#[derive(Clone, Default)]
pub struct SchemaContract {
    body: Option<Arc<dyn Validator>>,
    query: Option<Arc<dyn Validator>>,
    output: Option<Arc<dyn Validator>>,
    error: Option<Arc<dyn Validator>>,
}

impl SchemaContract {
    /// A contract with no validators; every value passes through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator for the request body.
    #[must_use]
    pub fn body(mut self, validator: impl Validator + 'static) -> Self {
        self.body = Some(Arc::new(validator));
        self
    }

    /// Validator for the query string.
    #[must_use]
    pub fn query(mut self, validator: impl Validator + 'static) -> Self {
        self.query = Some(Arc::new(validator));
        self
    }

    /// Validator for successful response bodies.
    #[must_use]
    pub fn output(mut self, validator: impl Validator + 'static) -> Self {
        self.output = Some(Arc::new(validator));
        self
    }

    /// Validator for unsuccessful response bodies.
    #[must_use]
    pub fn error(mut self, validator: impl Validator + 'static) -> Self {
        self.error = Some(Arc::new(validator));
        self
    }

    #[must_use]
    pub fn body_validator(&self) -> Option<&dyn Validator> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn query_validator(&self) -> Option<&dyn Validator> {
        self.query.as_deref()
    }

    #[must_use]
    pub fn output_validator(&self) -> Option<&dyn Validator> {
        self.output.as_deref()
    }

    #[must_use]
    pub fn error_validator(&self) -> Option<&dyn Validator> {
        self.error.as_deref()
    }
}

impl fmt::Debug for SchemaContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaContract")
            .field("body", &self.body.is_some())
            .field("query", &self.query.is_some())
            .field("output", &self.output.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

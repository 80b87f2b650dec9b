use std::fmt;

/// A schema document could not be turned into a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The JSON Schema document is not a valid schema
    InvalidSchema {
        /// Compiler message
        message: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidSchema { message } => write!(f, "invalid JSON Schema: {message}"),
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<jsonschema::ValidationError<'_>> for SchemaError {
    fn from(e: jsonschema::ValidationError<'_>) -> Self {
        SchemaError::InvalidSchema {
            message: e.to_string(),
        }
    }
}

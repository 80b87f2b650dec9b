use std::fmt;

use crate::pattern::BuildError;
use crate::schema::SchemaIssues;

/// Which declared response schema a body was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Output,
    Error,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::Output => f.write_str("Output"),
            ResponseKind::Error => f.write_str("Error"),
        }
    }
}

/// Errors raised while building, sending or interpreting a client call.
#[derive(Debug)]
pub enum ClientError {
    /// The endpoint could not be built from the supplied params
    Build(BuildError),
    /// A header or body given to the request builder was unusable
    InvalidRequest { pattern: String, message: String },
    /// The transport failed before a response was received
    Transport { url: String, message: String },
    /// The response body could not be decoded as its declared content type
    Decode { pattern: String, message: String },
    /// The server answered with a body violating the route's own declared schema
    ContractViolation {
        pattern: String,
        kind: ResponseKind,
        issues: SchemaIssues,
    },
}

impl ClientError {
    /// Route pattern the failure is attributed to, when known.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            ClientError::Build(BuildError::MissingParam { pattern, .. })
            | ClientError::Build(BuildError::ExpectedScalar { pattern, .. })
            | ClientError::Build(BuildError::EmptyValue { pattern, .. })
            | ClientError::InvalidRequest { pattern, .. }
            | ClientError::Decode { pattern, .. }
            | ClientError::ContractViolation { pattern, .. } => Some(pattern.as_str()),
            ClientError::Transport { .. } => None,
        }
    }

    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ClientError::ContractViolation { .. })
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Build(e) => write!(f, "Could not construct endpoint: {e}"),
            ClientError::InvalidRequest { pattern, message } => {
                write!(f, "Invalid request for {pattern}: {message}")
            }
            ClientError::Transport { url, message } => {
                write!(f, "Request to {url} failed: {message}")
            }
            ClientError::Decode { pattern, message } => {
                write!(f, "Could not decode response for {pattern}: {message}")
            }
            ClientError::ContractViolation {
                pattern,
                kind,
                issues,
            } => write!(f, "{kind} validation failed for {pattern}: {issues}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Build(e) => Some(e),
            ClientError::ContractViolation { issues, .. } => Some(issues),
            _ => None,
        }
    }
}

impl From<BuildError> for ClientError {
    fn from(e: BuildError) -> Self {
        ClientError::Build(e)
    }
}

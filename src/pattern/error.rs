use std::fmt;

/// A route pattern could not be parsed.
///
/// Raised by [`RoutePattern::parse`](super::RoutePattern::parse). During registry
/// generation the offending route is logged and omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// `[` and `]` do not pair up within a segment
    UnbalancedBrackets {
        /// The offending segment
        segment: String,
    },
    /// Brackets are used in a form that is not `[x]`, `[...x]` or `[[...x]]`
    MalformedSegment {
        /// The offending segment
        segment: String,
    },
    /// A bracketed segment without a usable parameter name
    EmptyParamName {
        /// The offending segment
        segment: String,
    },
    /// A catch-all segment is followed by further segments
    CatchAllNotTerminal {
        /// Name of the catch-all parameter
        name: String,
    },
    /// The same parameter name appears twice
    DuplicateParam {
        /// The repeated name
        name: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnbalancedBrackets { segment } => {
                write!(f, "unbalanced brackets in segment '{segment}'")
            }
            PatternError::MalformedSegment { segment } => write!(
                f,
                "malformed segment '{segment}': expected [name], [...name] or [[...name]]"
            ),
            PatternError::EmptyParamName { segment } => {
                write!(f, "missing parameter name in segment '{segment}'")
            }
            PatternError::CatchAllNotTerminal { name } => {
                write!(f, "catch-all parameter '{name}' must be the last segment")
            }
            PatternError::DuplicateParam { name } => {
                write!(f, "parameter '{name}' is declared more than once")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A concrete path could not be built from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A required dynamic or catch-all value was not supplied
    MissingParam {
        /// The pattern being built
        pattern: String,
        /// Name of the missing parameter
        name: String,
    },
    /// A sequence was supplied for a dynamic segment
    ExpectedScalar {
        /// The pattern being built
        pattern: String,
        /// Name of the parameter
        name: String,
    },
    /// An empty string was supplied where a path segment is expected
    EmptyValue {
        /// The pattern being built
        pattern: String,
        /// Name of the parameter
        name: String,
    },
}

impl BuildError {
    /// Name of the parameter the error refers to.
    #[must_use]
    pub fn param(&self) -> &str {
        match self {
            BuildError::MissingParam { name, .. }
            | BuildError::ExpectedScalar { name, .. }
            | BuildError::EmptyValue { name, .. } => name,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingParam { pattern, name } => {
                write!(f, "missing parameter '{name}' for route {pattern}")
            }
            BuildError::ExpectedScalar { pattern, name } => write!(
                f,
                "parameter '{name}' for route {pattern} takes a single value, got a list"
            ),
            BuildError::EmptyValue { pattern, name } => write!(
                f,
                "parameter '{name}' for route {pattern} has an empty segment value"
            ),
        }
    }
}

impl std::error::Error for BuildError {}

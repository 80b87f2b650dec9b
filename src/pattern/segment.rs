//! Segment classification for bracket-style route patterns.

use super::error::PatternError;

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Static text that must match exactly
    Literal(String),
    /// `[name]`: binds exactly one path segment
    Dynamic(String),
    /// `[...name]`: binds one or more trailing path segments
    CatchAll(String),
    /// `[[...name]]`: binds zero or more trailing path segments
    OptionalCatchAll(String),
}

impl Segment {
    /// Parameter name bound by this segment, `None` for literals.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Dynamic(name) | Segment::CatchAll(name) | Segment::OptionalCatchAll(name) => {
                Some(name)
            }
        }
    }

    /// Whether this segment consumes the rest of the path.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAll(_) | Segment::OptionalCatchAll(_))
    }

    /// Render the segment back into pattern syntax.
    #[must_use]
    pub fn to_pattern_text(&self) -> String {
        match self {
            Segment::Literal(text) => text.clone(),
            Segment::Dynamic(name) => format!("[{name}]"),
            Segment::CatchAll(name) => format!("[...{name}]"),
            Segment::OptionalCatchAll(name) => format!("[[...{name}]]"),
        }
    }
}

/// Classify a single pattern token.
///
/// Rules are evaluated in order:
///
/// 1. `[[...name]]` is an optional catch-all
/// 2. `[...name]` is a catch-all
/// 3. `[name]` is a dynamic segment
/// 4. anything without brackets is a literal
///
/// Any other use of brackets is rejected.
///
/// # Errors
///
/// Returns [`PatternError::UnbalancedBrackets`] when `[` and `]` do not pair up, and
/// [`PatternError::MalformedSegment`] / [`PatternError::EmptyParamName`] for bracketed
/// tokens that fit none of the forms above.
///
/// # Examples
///
/// ```
/// use typedroute::pattern::{classify_segment, Segment};
///
/// assert_eq!(classify_segment("about").unwrap(), Segment::Literal("about".into()));
/// assert_eq!(classify_segment("[id]").unwrap(), Segment::Dynamic("id".into()));
/// assert_eq!(classify_segment("[...slug]").unwrap(), Segment::CatchAll("slug".into()));
/// assert_eq!(
///     classify_segment("[[...slug]]").unwrap(),
///     Segment::OptionalCatchAll("slug".into())
/// );
/// assert!(classify_segment("[id").is_err());
/// ```
pub fn classify_segment(token: &str) -> Result<Segment, PatternError> {
    check_balanced(token)?;

    if !token.contains('[') {
        return Ok(Segment::Literal(token.to_string()));
    }

    if let Some(inner) = token.strip_prefix("[[").and_then(|s| s.strip_suffix("]]")) {
        return match inner.strip_prefix("...") {
            Some(name) => param_name(token, name).map(Segment::OptionalCatchAll),
            None => Err(PatternError::MalformedSegment {
                segment: token.to_string(),
            }),
        };
    }

    match token.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) if !inner.contains('[') && !inner.contains(']') => {
            match inner.strip_prefix("...") {
                Some(name) => param_name(token, name).map(Segment::CatchAll),
                None => param_name(token, inner).map(Segment::Dynamic),
            }
        }
        _ => Err(PatternError::MalformedSegment {
            segment: token.to_string(),
        }),
    }
}

fn check_balanced(token: &str) -> Result<(), PatternError> {
    let mut depth: i32 = 0;
    for c in token.chars() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(PatternError::UnbalancedBrackets {
            segment: token.to_string(),
        })
    }
}

fn param_name(token: &str, name: &str) -> Result<String, PatternError> {
    if name.is_empty() || name.starts_with('.') {
        return Err(PatternError::EmptyParamName {
            segment: token.to_string(),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_literal() {
        assert_eq!(
            classify_segment("about").unwrap(),
            Segment::Literal("about".to_string())
        );
    }

    #[test]
    fn test_classify_dynamic() {
        assert_eq!(
            classify_segment("[id]").unwrap(),
            Segment::Dynamic("id".to_string())
        );
    }

    #[test]
    fn test_classify_catch_all() {
        assert_eq!(
            classify_segment("[...slug]").unwrap(),
            Segment::CatchAll("slug".to_string())
        );
    }

    #[test]
    fn test_classify_optional_catch_all() {
        assert_eq!(
            classify_segment("[[...slug]]").unwrap(),
            Segment::OptionalCatchAll("slug".to_string())
        );
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(matches!(
            classify_segment("[id"),
            Err(PatternError::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            classify_segment("id]"),
            Err(PatternError::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            classify_segment("[[...slug]"),
            Err(PatternError::UnbalancedBrackets { .. })
        ));
    }

    #[test]
    fn test_malformed_segments() {
        assert!(matches!(
            classify_segment("[[id]]"),
            Err(PatternError::MalformedSegment { .. })
        ));
        assert!(matches!(
            classify_segment("user-[id]"),
            Err(PatternError::MalformedSegment { .. })
        ));
        assert!(matches!(
            classify_segment("[]"),
            Err(PatternError::EmptyParamName { .. })
        ));
        assert!(matches!(
            classify_segment("[...]"),
            Err(PatternError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn test_pattern_text_round_trip() {
        for token in ["about", "[id]", "[...slug]", "[[...slug]]"] {
            assert_eq!(classify_segment(token).unwrap().to_pattern_text(), token);
        }
    }
}

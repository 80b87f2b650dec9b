use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use super::error::{BuildError, PatternError};
use super::params::{ParamMap, ParamValue};
use super::segment::{classify_segment, Segment};

/// Path separator used by patterns and concrete paths.
pub const SEPARATOR: char = '/';

/// Shape of a single route parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Bound by a dynamic segment
    Scalar,
    /// Bound by a catch-all or optional catch-all segment
    Sequence,
}

/// Name, kind and optionality of one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub kind: ParamKind,
    /// `false` only for optional catch-alls
    pub required: bool,
}

/// Parameter shape of a pattern, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamShape(Vec<ParamDescriptor>);

impl ParamShape {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Kind of the named parameter.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<ParamKind> {
        self.get(name).map(|d| d.kind)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamDescriptor> {
        self.0.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.0.iter()
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|d| d.name.as_str())
    }
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let kind = match d.kind {
                ParamKind::Scalar => "scalar",
                ParamKind::Sequence => "sequence",
            };
            let optional = if d.required { "" } else { "?" };
            write!(f, "{}{}: {}", d.name, optional, kind)?;
        }
        f.write_str("}")
    }
}

/// A parsed route pattern.
///
/// Parsing validates the whole pattern once; building and matching never fail on the
/// pattern itself afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    /// Normalized textual form, e.g. `/api/[id]`
    raw: String,
    segments: Vec<Segment>,
}

/// Split a path on the separator, dropping the empty pieces left by leading, trailing
/// and doubled separators.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

impl RoutePattern {
    /// Parse a pattern string into its segments.
    ///
    /// The pattern is normalized first: a missing leading `/` is added, a trailing `/`
    /// is dropped, and `//` collapses.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when a segment is malformed, a catch-all is not the last
    /// segment, or a parameter name is repeated.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let tokens: Vec<&str> = split_path(pattern).collect();
        let mut segments = Vec::with_capacity(tokens.len());
        let mut seen = HashSet::new();

        for (i, token) in tokens.iter().enumerate() {
            let segment = classify_segment(token)?;
            if let Some(name) = segment.param_name() {
                if !seen.insert(name.to_string()) {
                    return Err(PatternError::DuplicateParam {
                        name: name.to_string(),
                    });
                }
                if segment.is_catch_all() && i + 1 != tokens.len() {
                    return Err(PatternError::CatchAllNotTerminal {
                        name: name.to_string(),
                    });
                }
            }
            segments.push(segment);
        }

        let raw = render(&segments);
        trace!(pattern = %raw, segments = segments.len(), "route pattern parsed");
        Ok(RoutePattern { raw, segments })
    }

    /// The normalized pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern has no parameters at all.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Derive the parameter shape: dynamic segments are scalars, catch-alls sequences.
    ///
    /// ```
    /// use typedroute::pattern::{ParamKind, RoutePattern};
    ///
    /// let shape = RoutePattern::parse("/api/[name]/hello/[id]/[again]").unwrap().param_shape();
    /// assert_eq!(shape.len(), 3);
    /// assert_eq!(shape.kind("again"), Some(ParamKind::Scalar));
    /// ```
    #[must_use]
    pub fn param_shape(&self) -> ParamShape {
        let descriptors = self
            .segments
            .iter()
            .fold(Vec::new(), |mut acc, segment| {
                match segment {
                    Segment::Literal(_) => {}
                    Segment::Dynamic(name) => acc.push(ParamDescriptor {
                        name: name.clone(),
                        kind: ParamKind::Scalar,
                        required: true,
                    }),
                    Segment::CatchAll(name) => acc.push(ParamDescriptor {
                        name: name.clone(),
                        kind: ParamKind::Sequence,
                        required: true,
                    }),
                    Segment::OptionalCatchAll(name) => acc.push(ParamDescriptor {
                        name: name.clone(),
                        kind: ParamKind::Sequence,
                        required: false,
                    }),
                }
                acc
            });
        ParamShape(descriptors)
    }

    /// Substitute parameters into the pattern, producing a concrete path.
    ///
    /// Values are percent-encoded per segment. An absent optional catch-all drops its
    /// segment together with its separator; an empty list counts as absent.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingParam`] names the first required parameter without a value,
    /// [`BuildError::ExpectedScalar`] a dynamic parameter given a list, and
    /// [`BuildError::EmptyValue`] a parameter whose value (or list element) is empty,
    /// since an empty segment would not match back.
    pub fn build(&self, params: &ParamMap) -> Result<String, BuildError> {
        let mut path = String::with_capacity(self.raw.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    path.push(SEPARATOR);
                    path.push_str(text);
                }
                Segment::Dynamic(name) => match params.get(name) {
                    Some(ParamValue::Single(value)) if value.is_empty() => {
                        return Err(self.empty(name))
                    }
                    Some(ParamValue::Single(value)) => {
                        path.push(SEPARATOR);
                        path.push_str(&urlencoding::encode(value));
                    }
                    Some(ParamValue::Many(_)) => {
                        return Err(BuildError::ExpectedScalar {
                            pattern: self.raw.clone(),
                            name: name.clone(),
                        })
                    }
                    None => return Err(self.missing(name)),
                },
                Segment::CatchAll(name) => {
                    let values = params.get_many(name).unwrap_or_default();
                    if values.is_empty() {
                        return Err(self.missing(name));
                    }
                    self.push_all(&mut path, name, values)?;
                }
                Segment::OptionalCatchAll(name) => {
                    if let Some(values) = params.get_many(name) {
                        self.push_all(&mut path, name, values)?;
                    }
                }
            }
        }

        if path.is_empty() {
            path.push(SEPARATOR);
        }
        Ok(path)
    }

    /// Match a concrete path against the pattern.
    ///
    /// Literal segments must be equal; dynamic segments bind one percent-decoded segment;
    /// a catch-all takes every remaining segment and is always the last comparison. Any
    /// query string is ignored. An optional catch-all with nothing left to take is left
    /// out of the returned map.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<ParamMap> {
        let path = path.split('?').next().unwrap_or_default();
        let parts: Vec<&str> = split_path(path).collect();
        let mut params = ParamMap::new();
        let mut idx = 0;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    if parts.get(idx) != Some(&text.as_str()) {
                        return None;
                    }
                    idx += 1;
                }
                Segment::Dynamic(name) => {
                    let part = parts.get(idx)?;
                    params.insert(name.clone(), decode(part));
                    idx += 1;
                }
                Segment::CatchAll(name) => {
                    let rest = &parts[idx.min(parts.len())..];
                    if rest.is_empty() {
                        return None;
                    }
                    params.insert_many(name.clone(), rest.iter().map(|p| decode(p)));
                    return Some(params);
                }
                Segment::OptionalCatchAll(name) => {
                    let rest = &parts[idx.min(parts.len())..];
                    if !rest.is_empty() {
                        params.insert_many(name.clone(), rest.iter().map(|p| decode(p)));
                    }
                    return Some(params);
                }
            }
        }

        (idx == parts.len()).then_some(params)
    }

    fn missing(&self, name: &str) -> BuildError {
        BuildError::MissingParam {
            pattern: self.raw.clone(),
            name: name.to_string(),
        }
    }

    fn empty(&self, name: &str) -> BuildError {
        BuildError::EmptyValue {
            pattern: self.raw.clone(),
            name: name.to_string(),
        }
    }

    fn push_all(&self, path: &mut String, name: &str, values: &[String]) -> Result<(), BuildError> {
        if values.iter().any(String::is_empty) {
            return Err(self.empty(name));
        }
        for value in values {
            path.push(SEPARATOR);
            path.push_str(&urlencoding::encode(value));
        }
        Ok(())
    }
}

fn decode(part: &str) -> String {
    urlencoding::decode(part)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| part.to_string())
}

fn render(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return SEPARATOR.to_string();
    }
    segments.iter().fold(String::new(), |mut acc, s| {
        acc.push(SEPARATOR);
        acc.push_str(&s.to_pattern_text());
        acc
    })
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoutePattern::parse(s)
    }
}

impl TryFrom<&str> for RoutePattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RoutePattern::parse(value)
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

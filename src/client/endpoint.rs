use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::debug_enabled;
use crate::pattern::{BuildError, ParamMap, RoutePattern};

/// One query value: a scalar or a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Single(s)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Single(s.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::Many(v)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(v: Vec<&str>) -> Self {
        QueryValue::Many(v.into_iter().map(str::to_string).collect())
    }
}

/// Query parameters for a client call, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap(Vec<(String, QueryValue)>);

impl QueryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value for the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
        self
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten a serializable struct into query pairs.
    ///
    /// Scalars become strings, sequences become repeated keys, `null` fields are skipped
    /// and nested objects are sent as their JSON text.
    ///
    /// # Errors
    ///
    /// Fails when `value` does not serialize to a JSON object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let Value::Object(fields) = serde_json::to_value(value)? else {
            return Err(<serde_json::Error as serde::ser::Error>::custom(
                "query parameters must serialize to an object",
            ));
        };
        let mut map = QueryMap::new();
        for (key, value) in fields {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let items: Vec<String> = items.iter().filter_map(scalar_text).collect();
                    map.insert(key, items);
                }
                other => {
                    if let Some(text) = scalar_text(&other) {
                        map.insert(key, text);
                    }
                }
            }
        }
        Ok(map)
    }

    /// Encode as an `application/x-www-form-urlencoded` query string, without the `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            match value {
                QueryValue::Single(v) => {
                    serializer.append_pair(key, v);
                }
                QueryValue::Many(values) => {
                    for v in values {
                        serializer.append_pair(key, v);
                    }
                }
            }
        }
        serializer.finish()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Build the request target for `pattern`: the concrete path, then `?query` when the
/// query map is non-empty.
///
/// ```rust
/// use typedroute::client::{resolve_endpoint, QueryMap};
/// use typedroute::pattern::{ParamMap, RoutePattern};
///
/// let pattern = RoutePattern::parse("/api/projects/[id]").unwrap();
/// let params = ParamMap::new().with("id", "42");
/// let query = QueryMap::new().with("tag", vec!["a", "b"]);
/// assert_eq!(
///     resolve_endpoint(&pattern, &params, &query).unwrap(),
///     "/api/projects/42?tag=a&tag=b"
/// );
/// ```
///
/// # Errors
///
/// Propagates the [`BuildError`] when a required parameter is missing.
pub fn resolve_endpoint(
    pattern: &RoutePattern,
    params: &ParamMap,
    query: &QueryMap,
) -> Result<String, BuildError> {
    let mut endpoint = pattern.build(params)?;
    if !query.is_empty() {
        endpoint.push('?');
        endpoint.push_str(&query.to_query_string());
    }

    if debug_enabled() {
        info!(pattern = %pattern, endpoint = %endpoint, "resolved endpoint");
    } else {
        debug!(pattern = %pattern, endpoint = %endpoint, "resolved endpoint");
    }
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_query() {
        let pattern = RoutePattern::parse("/api/[name]/hello/[id]").unwrap();
        let params = ParamMap::new().with("name", "ada").with("id", "7");
        assert_eq!(
            resolve_endpoint(&pattern, &params, &QueryMap::new()).unwrap(),
            "/api/ada/hello/7"
        );
    }

    #[test]
    fn test_resolve_encodes_query() {
        let pattern = RoutePattern::parse("/search").unwrap();
        let query = QueryMap::new().with("q", "a b&c").with("page", "2");
        assert_eq!(
            resolve_endpoint(&pattern, &ParamMap::new(), &query).unwrap(),
            "/search?q=a+b%26c&page=2"
        );
    }

    #[test]
    fn test_resolve_missing_param() {
        let pattern = RoutePattern::parse("/files/[...slug]").unwrap();
        let err = resolve_endpoint(&pattern, &ParamMap::new(), &QueryMap::new()).unwrap_err();
        assert_eq!(err.param(), "slug");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut query = QueryMap::new();
        query.insert("a", "1").insert("b", "2").insert("a", "3");
        assert_eq!(query.to_query_string(), "a=3&b=2");
    }

    #[derive(Serialize)]
    struct Filters {
        status: &'static str,
        limit: u32,
        tags: Vec<&'static str>,
        cursor: Option<String>,
    }

    #[test]
    fn test_from_serializable() {
        let query = QueryMap::from_serializable(&Filters {
            status: "open",
            limit: 10,
            tags: vec!["x", "y"],
            cursor: None,
        })
        .unwrap();
        assert_eq!(query.len(), 3);
        assert_eq!(query.to_query_string(), "status=open&limit=10&tags=x&tags=y");
    }

    #[test]
    fn test_from_serializable_rejects_scalars() {
        assert!(QueryMap::from_serializable(&42).is_err());
    }
}

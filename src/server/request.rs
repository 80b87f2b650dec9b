use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::HeaderMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::SchemaIssues;

/// How an inbound body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json` (or any `+json` media type)
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
    /// No body, an unrecognized content type, or a declared length of zero
    Empty,
}

/// Media type without parameters, lowercased.
///
/// `Application/JSON; charset=utf-8` becomes `application/json`.
#[must_use]
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a media type essence denotes JSON.
#[must_use]
pub fn is_json_media_type(essence: &str) -> bool {
    essence == "application/json" || essence.ends_with("+json")
}

/// Select the body decoding strategy from the request headers.
#[must_use]
pub fn detect_body_format(headers: &HeaderMap) -> BodyFormat {
    let declared_len = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared_len == Some(0) {
        return BodyFormat::Empty;
    }

    let essence = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(media_type_essence)
        .unwrap_or_default();

    if is_json_media_type(&essence) {
        BodyFormat::Json
    } else if essence == "application/x-www-form-urlencoded" {
        BodyFormat::Form
    } else {
        BodyFormat::Empty
    }
}

/// Decode a request body with the selected strategy.
///
/// An empty payload decodes to an empty object whatever the format.
///
/// # Errors
///
/// Returns a root-level issue when a JSON payload is malformed.
pub fn parse_body(format: BodyFormat, body: &Bytes) -> Result<Value, SchemaIssues> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match format {
        BodyFormat::Json => serde_json::from_slice(body).map_err(|e| {
            debug!(error = %e, body_size_bytes = body.len(), "JSON body parse failed");
            SchemaIssues::single(format!("Malformed JSON body: {e}"))
        }),
        BodyFormat::Form => Ok(collect_pairs(url::form_urlencoded::parse(body))),
        BodyFormat::Empty => Ok(Value::Object(Map::new())),
    }
}

/// Decode a raw query string into a JSON object.
///
/// ```
/// use serde_json::json;
/// use typedroute::server::parse_query;
///
/// assert_eq!(
///     parse_query(Some("page=2&tag=a&tag=b")),
///     json!({"page": "2", "tag": ["a", "b"]})
/// );
/// ```
#[must_use]
pub fn parse_query(query: Option<&str>) -> Value {
    match query {
        Some(q) if !q.is_empty() => collect_pairs(url::form_urlencoded::parse(q.as_bytes())),
        _ => Value::Object(Map::new()),
    }
}

/// Fold urlencoded pairs into an object. A key seen once maps to a string; a repeated key
/// maps to an array of its values in arrival order.
fn collect_pairs<'a, I>(pairs: I) -> Value
where
    I: Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
{
    let mut map = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn headers(pairs: &[(http::header::HeaderName, &'static str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(k.clone(), HeaderValue::from_static(v));
        }
        h
    }

    #[test]
    fn test_detect_json() {
        assert_eq!(
            detect_body_format(&headers(&[(CONTENT_TYPE, "application/json")])),
            BodyFormat::Json
        );
        assert_eq!(
            detect_body_format(&headers(&[(CONTENT_TYPE, "Application/JSON; charset=utf-8")])),
            BodyFormat::Json
        );
        assert_eq!(
            detect_body_format(&headers(&[(CONTENT_TYPE, "application/problem+json")])),
            BodyFormat::Json
        );
    }

    #[test]
    fn test_detect_form() {
        assert_eq!(
            detect_body_format(&headers(&[(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded"
            )])),
            BodyFormat::Form
        );
    }

    #[test]
    fn test_detect_empty() {
        assert_eq!(detect_body_format(&HeaderMap::new()), BodyFormat::Empty);
        assert_eq!(
            detect_body_format(&headers(&[(CONTENT_TYPE, "text/plain")])),
            BodyFormat::Empty
        );
        assert_eq!(
            detect_body_format(&headers(&[
                (CONTENT_TYPE, "application/json"),
                (CONTENT_LENGTH, "0")
            ])),
            BodyFormat::Empty
        );
    }

    #[test]
    fn test_parse_body_json() {
        let body = Bytes::from_static(br#"{"name":"x"}"#);
        assert_eq!(
            parse_body(BodyFormat::Json, &body).unwrap(),
            json!({"name": "x"})
        );
    }

    #[test]
    fn test_parse_body_malformed_json() {
        let body = Bytes::from_static(b"{nope");
        let issues = parse_body(BodyFormat::Json, &body).unwrap_err();
        assert!(issues.flatten().form_errors[0].starts_with("Malformed JSON body"));
    }

    #[test]
    fn test_parse_body_form() {
        let body = Bytes::from_static(b"name=Ada+L&tag=a&tag=b");
        assert_eq!(
            parse_body(BodyFormat::Form, &body).unwrap(),
            json!({"name": "Ada L", "tag": ["a", "b"]})
        );
    }

    #[test]
    fn test_parse_body_empty_defaults_to_object() {
        assert_eq!(
            parse_body(BodyFormat::Json, &Bytes::new()).unwrap(),
            json!({})
        );
        assert_eq!(
            parse_body(BodyFormat::Empty, &Bytes::from_static(b"ignored")).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_query(None), json!({}));
        assert_eq!(parse_query(Some("")), json!({}));
        assert_eq!(
            parse_query(Some("q=hello%20world&n=1&n=2&n=3")),
            json!({"q": "hello world", "n": ["1", "2", "3"]})
        );
    }
}

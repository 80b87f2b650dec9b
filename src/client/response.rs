use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ClientError, ResponseKind};
use super::transport::RawResponse;
use crate::pattern::RoutePattern;
use crate::schema::{SchemaContract, Validator};
use crate::server::{is_json_media_type, media_type_essence};

/// Outcome of a client call whose response honoured the route contract.
///
/// Exactly one of `data` and `error` exists, matching the variant; the raw response is
/// always attached.
#[derive(Debug, Clone)]
pub enum ClientResult {
    /// 2xx response, body validated against the output schema
    Success { data: Value, response: RawResponse },
    /// Non-2xx response, body validated against the error schema
    Failure { error: Value, response: RawResponse },
}

impl ClientResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ClientResult::Success { .. })
    }

    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            ClientResult::Success { data, .. } => Some(data),
            ClientResult::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&Value> {
        match self {
            ClientResult::Success { .. } => None,
            ClientResult::Failure { error, .. } => Some(error),
        }
    }

    #[must_use]
    pub fn response(&self) -> &RawResponse {
        match self {
            ClientResult::Success { response, .. } | ClientResult::Failure { response, .. } => {
                response
            }
        }
    }

    #[must_use]
    pub fn into_response(self) -> RawResponse {
        match self {
            ClientResult::Success { response, .. } | ClientResult::Failure { response, .. } => {
                response
            }
        }
    }

    /// Deserialize the success data; `None` on a failure result.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the data does not fit `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.data().map(|v| T::deserialize(v))
    }

    /// Deserialize the error payload; `None` on a success result.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the payload does not fit `T`.
    pub fn error_as<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.error().map(|v| T::deserialize(v))
    }
}

/// Decode a response body by its content type.
///
/// A missing content type is treated as JSON. JSON bodies are parsed, `text/plain`
/// becomes a string, an empty body or any other type decodes to `null`.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] when a JSON body is malformed.
pub fn decode_body(pattern: &RoutePattern, response: &RawResponse) -> Result<Value, ClientError> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    let essence = response
        .content_type()
        .map_or_else(|| "application/json".to_string(), media_type_essence);

    if is_json_media_type(&essence) {
        serde_json::from_slice(&response.body).map_err(|e| ClientError::Decode {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    } else if essence == "text/plain" {
        Ok(Value::String(response.text()))
    } else {
        debug!(pattern = %pattern, content_type = %essence, "response body not decoded");
        Ok(Value::Null)
    }
}

/// Decode and validate a response against the route contract.
///
/// 2xx bodies go through the `output` validator, others through `error`; a body passes
/// unchanged when the matching validator is absent.
///
/// # Errors
///
/// Returns [`ClientError::ContractViolation`] when the body fails the declared schema,
/// and [`ClientError::Decode`] when it cannot be decoded.
pub fn transform_response(
    pattern: &RoutePattern,
    response: RawResponse,
    contract: &SchemaContract,
) -> Result<ClientResult, ClientError> {
    let decoded = decode_body(pattern, &response)?;

    if response.is_success() {
        let data = check(pattern, contract.output_validator(), decoded, ResponseKind::Output)?;
        Ok(ClientResult::Success { data, response })
    } else {
        let error = check(pattern, contract.error_validator(), decoded, ResponseKind::Error)?;
        Ok(ClientResult::Failure { error, response })
    }
}

fn check(
    pattern: &RoutePattern,
    validator: Option<&dyn Validator>,
    value: Value,
    kind: ResponseKind,
) -> Result<Value, ClientError> {
    let Some(validator) = validator else {
        return Ok(value);
    };
    validator.parse(&value).map_err(|issues| {
        warn!(pattern = %pattern, kind = %kind, issues = %issues, "response violates route contract");
        ClientError::ContractViolation {
            pattern: pattern.to_string(),
            kind,
            issues,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JsonSchemaValidator;
    use bytes::Bytes;
    use http::header::CONTENT_TYPE;
    use http::{HeaderMap, HeaderValue, StatusCode};
    use serde_json::json;

    fn raw(status: u16, content_type: Option<&'static str>, body: &'static str) -> RawResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: Bytes::from_static(body.as_bytes()),
            url: "http://localhost/api/projects/1".to_string(),
        }
    }

    fn pattern() -> RoutePattern {
        RoutePattern::parse("/api/projects/[id]").unwrap()
    }

    fn contract() -> SchemaContract {
        SchemaContract::new()
            .output(
                JsonSchemaValidator::new(&json!({
                    "type": "object",
                    "required": ["id"],
                    "properties": {"id": {"type": "string"}}
                }))
                .unwrap(),
            )
            .error(
                JsonSchemaValidator::new(&json!({
                    "type": "object",
                    "required": ["message"]
                }))
                .unwrap(),
            )
    }

    #[test]
    fn test_success_validated() {
        let res = raw(200, Some("application/json"), r#"{"id":"1"}"#);
        let result = transform_response(&pattern(), res, &contract()).unwrap();
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&json!({"id": "1"})));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_failure_validated() {
        let res = raw(404, Some("application/json"), r#"{"message":"not found"}"#);
        let result = transform_response(&pattern(), res, &contract()).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.error(), Some(&json!({"message": "not found"})));
        assert_eq!(result.response().status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_output_violation_is_labelled() {
        let res = raw(200, Some("application/json"), r#"{"id":1}"#);
        let err = transform_response(&pattern(), res, &contract()).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(err.pattern(), Some("/api/projects/[id]"));
        assert!(err
            .to_string()
            .starts_with("Output validation failed for /api/projects/[id]"));
    }

    #[test]
    fn test_error_violation_is_labelled() {
        let res = raw(500, Some("application/json"), r#"{"oops":true}"#);
        let err = transform_response(&pattern(), res, &contract()).unwrap_err();
        assert!(matches!(
            err,
            ClientError::ContractViolation {
                kind: ResponseKind::Error,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_content_type_is_json() {
        let res = raw(200, None, r#"{"id":"9"}"#);
        let result = transform_response(&pattern(), res, &SchemaContract::new()).unwrap();
        assert_eq!(result.data(), Some(&json!({"id": "9"})));
    }

    #[test]
    fn test_text_and_unknown_bodies() {
        let text = raw(200, Some("text/plain; charset=utf-8"), "hello");
        let result = transform_response(&pattern(), text, &SchemaContract::new()).unwrap();
        assert_eq!(result.data(), Some(&json!("hello")));

        let html = raw(200, Some("text/html"), "<p>hi</p>");
        let result = transform_response(&pattern(), html, &SchemaContract::new()).unwrap();
        assert_eq!(result.data(), Some(&Value::Null));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let res = raw(200, Some("application/json"), "{");
        let err = transform_response(&pattern(), res, &SchemaContract::new()).unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_data_as() {
        #[derive(serde::Deserialize)]
        struct Project {
            id: String,
        }
        let res = raw(200, Some("application/json"), r#"{"id":"3"}"#);
        let result = transform_response(&pattern(), res, &contract()).unwrap();
        let project: Project = result.data_as().unwrap().unwrap();
        assert_eq!(project.id, "3");
        assert!(result.error_as::<Value>().is_none());
    }
}

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use serde::Serialize;

use super::handler::{InputSource, ValidationFailure};

/// Message used when the request body fails validation.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
/// Message used when the query string fails validation.
pub const INVALID_QUERY_MESSAGE: &str = "Invalid query parameters";

/// Body of the default validation error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ErrorBody {
    /// Describe a validation failure: a fixed message per source, and the first issue of
    /// the first invalid field as description (a root-level issue if no field failed).
    #[must_use]
    pub fn from_failure(failure: &ValidationFailure) -> Self {
        let message = match failure.source {
            InputSource::Body => INVALID_BODY_MESSAGE,
            InputSource::Query => INVALID_QUERY_MESSAGE,
        };
        let flat = failure.issues.flatten();
        let description = flat
            .first_field_error()
            .map(|(_, msg)| msg.to_string())
            .or_else(|| flat.form_errors.first().cloned());
        ErrorBody {
            message: message.to_string(),
            description,
        }
    }
}

/// Serialize `body` as a JSON response with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Bytes> {
    let payload = serde_json::to_vec(body).unwrap_or_default();
    let mut res = Response::new(Bytes::from(payload));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

/// The response produced for a validation failure when no override is installed:
/// status 400 with `{message, description}`.
#[must_use]
pub fn default_error_response(failure: &ValidationFailure) -> Response<Bytes> {
    json_response(StatusCode::BAD_REQUEST, &ErrorBody::from_failure(failure))
}

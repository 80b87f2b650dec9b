use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ClientError;

/// A request ready to hand to a [`Transport`].
#[derive(Debug, Clone)]
pub struct ClientRequest {
    pub method: Method,
    /// Path and query, or an absolute URL
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// A response as received from the transport, body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// The URL the request was sent to
    pub url: String,
}

impl RawResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Body as text, invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns the full response.
///
/// The client issues exactly one `send` per call and never retries.
pub trait Transport: Send + Sync {
    /// Perform the request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when no response could be obtained.
    fn send(&self, request: ClientRequest) -> BoxFuture<'_, Result<RawResponse, ClientError>>;
}

/// [`Transport`] backed by a `reqwest` client.
///
/// Relative request targets are joined onto the configured base URL.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<url::Url>,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing `reqwest` client, keeping its pool and settings.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport {
            client,
            base_url: None,
        }
    }

    /// Resolve relative targets against `base`.
    ///
    /// # Errors
    ///
    /// Fails when `base` is not an absolute URL.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ClientError> {
        let parsed = url::Url::parse(base).map_err(|e| ClientError::Transport {
            url: base.to_string(),
            message: format!("invalid base URL: {e}"),
        })?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    fn target(&self, url: &str) -> Result<url::Url, ClientError> {
        let parsed = match &self.base_url {
            Some(base) => base.join(url),
            None => url::Url::parse(url),
        };
        parsed.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: format!("invalid URL: {e}"),
        })
    }

    async fn execute(&self, request: ClientRequest) -> Result<RawResponse, ClientError> {
        let target = self.target(&request.url)?;
        let mut builder = self
            .client
            .request(request.method.clone(), target.clone())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(url = %target, error = %e, "transport call failed");
            ClientError::Transport {
                url: target.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response.bytes().await.map_err(|e| ClientError::Transport {
            url: url.clone(),
            message: format!("failed to read response body: {e}"),
        })?;

        debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            body_size_bytes = body.len(),
            "response received"
        );
        Ok(RawResponse {
            status,
            headers,
            body,
            url,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: ClientRequest) -> BoxFuture<'_, Result<RawResponse, ClientError>> {
        self.execute(request).boxed()
    }
}

/// Issue one call: `GET` never carries a body, other methods send `body` as JSON when
/// one is supplied.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] if the transport fails.
pub async fn perform_request(
    transport: &dyn Transport,
    endpoint: &str,
    method: Method,
    body: Option<&Value>,
    mut headers: HeaderMap,
) -> Result<RawResponse, ClientError> {
    let payload = match body {
        Some(_) if method == Method::GET => {
            debug!(endpoint, "dropping body on GET request");
            None
        }
        Some(value) => {
            let bytes = serde_json::to_vec(value).map_err(|e| ClientError::Transport {
                url: endpoint.to_string(),
                message: format!("failed to serialize body: {e}"),
            })?;
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Some(Bytes::from(bytes))
        }
        None => None,
    };

    transport
        .send(ClientRequest {
            method,
            url: endpoint.to_string(),
            headers,
            body: payload,
        })
        .await
}

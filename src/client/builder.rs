use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use super::endpoint::{resolve_endpoint, QueryMap, QueryValue};
use super::error::ClientError;
use super::response::{transform_response, ClientResult};
use super::transport::{perform_request, ReqwestTransport, Transport};
use crate::pattern::{ParamMap, ParamValue};
use crate::route::TypedRoute;

/// Entry point for typed calls against route contracts.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client over a custom transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Client {
            transport: Arc::new(transport),
        }
    }

    /// Client over `reqwest`, resolving route paths against `base_url`.
    ///
    /// # Errors
    ///
    /// Fails when `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::new(ReqwestTransport::new().with_base_url(base_url)?))
    }

    pub fn request<'a>(&'a self, method: Method, route: &'a TypedRoute) -> RequestBuilder<'a> {
        RequestBuilder {
            client: self,
            route,
            method,
            params: ParamMap::new(),
            query: QueryMap::new(),
            headers: HeaderMap::new(),
            body: None,
            invalid: None,
        }
    }

    pub fn get<'a>(&'a self, route: &'a TypedRoute) -> RequestBuilder<'a> {
        self.request(Method::GET, route)
    }

    pub fn post<'a>(&'a self, route: &'a TypedRoute) -> RequestBuilder<'a> {
        self.request(Method::POST, route)
    }

    pub fn put<'a>(&'a self, route: &'a TypedRoute) -> RequestBuilder<'a> {
        self.request(Method::PUT, route)
    }

    pub fn patch<'a>(&'a self, route: &'a TypedRoute) -> RequestBuilder<'a> {
        self.request(Method::PATCH, route)
    }

    pub fn delete<'a>(&'a self, route: &'a TypedRoute) -> RequestBuilder<'a> {
        self.request(Method::DELETE, route)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ReqwestTransport::new())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// One pending call. Nothing is sent until [`send`](Self::send).
pub struct RequestBuilder<'a> {
    client: &'a Client,
    route: &'a TypedRoute,
    method: Method,
    params: ParamMap,
    query: QueryMap,
    headers: HeaderMap,
    body: Option<Value>,
    /// First unusable input handed to the builder, reported by `send`
    invalid: Option<ClientError>,
}

impl RequestBuilder<'_> {
    /// Replace all route parameters.
    #[must_use]
    pub fn params(mut self, params: ParamMap) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Replace the whole query map.
    #[must_use]
    pub fn query(mut self, query: QueryMap) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Add a header. An invalid name or value fails the call at [`send`](Self::send).
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.reject(format!("invalid header name '{name}': {e}")),
            (_, Err(e)) => self.reject(format!("invalid value for header '{name}': {e}")),
        }
        self
    }

    /// Set the JSON body. Ignored for `GET`.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the JSON body from any serializable value.
    #[must_use]
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.reject(format!("body could not be serialized: {e}")),
        }
        self
    }

    fn reject(&mut self, message: String) {
        error!(pattern = %self.route.pattern(), error = %message, "request builder input rejected");
        if self.invalid.is_none() {
            self.invalid = Some(ClientError::InvalidRequest {
                pattern: self.route.pattern().to_string(),
                message,
            });
        }
    }

    /// Build the endpoint, perform the call and check the response against the contract.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRequest`] when a header or body given to the builder was unusable
    /// - [`ClientError::Build`] when a required parameter is missing
    /// - [`ClientError::Transport`] when the call itself fails
    /// - [`ClientError::Decode`] or [`ClientError::ContractViolation`] when the response
    ///   breaks the route contract
    pub async fn send(self) -> Result<ClientResult, ClientError> {
        if let Some(invalid) = self.invalid {
            return Err(invalid);
        }
        let pattern = self.route.pattern();
        let endpoint = resolve_endpoint(pattern, &self.params, &self.query)?;
        let raw = perform_request(
            self.client.transport.as_ref(),
            &endpoint,
            self.method,
            self.body.as_ref(),
            self.headers,
        )
        .await?;
        transform_response(pattern, raw, self.route.contract())
    }
}

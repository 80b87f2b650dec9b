use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use super::request::{detect_body_format, parse_body, parse_query};
use super::response::default_error_response;
use crate::pattern::ParamMap;
use crate::route::TypedRoute;
use crate::schema::{SchemaIssues, Validator};

/// Which part of the request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Body,
    Query,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Body => f.write_str("body"),
            InputSource::Query => f.write_str("query"),
        }
    }
}

/// A rejected request input, handed to the validation-error override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub source: InputSource,
    #[serde(rename = "error")]
    pub issues: SchemaIssues,
}

/// Stages a request moves through, in order. A request never moves backwards and ends in
/// either `Respond` or `ErrorRespond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Receive,
    DetectBodyFormat,
    ParseBody,
    ValidateBody,
    ParseQuery,
    ValidateQuery,
    ResolveParams,
    Invoke,
    Respond,
    ErrorRespond,
}

/// Validated inputs passed to a handler.
#[derive(Debug)]
pub struct HandlerArgs {
    /// The original request, body bytes included
    pub request: Request<Bytes>,
    /// Validated body, or `{}` when the route declares no body validator
    pub body: Value,
    /// Validated query, or `{}` when the route declares no query validator
    pub query: Value,
    /// Route parameters exactly as resolved by the host router
    pub params: ParamMap,
}

impl HandlerArgs {
    /// Deserialize the validated body.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body does not fit `T`.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }

    /// Deserialize the validated query.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the query does not fit `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.query)
    }

    /// Deserialize the route parameters.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the parameters do not fit `T`.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.params.deserialize()
    }
}

type BoxedHandler = Arc<dyn Fn(HandlerArgs) -> BoxFuture<'static, Response<Bytes>> + Send + Sync>;
type BoxedOverride =
    Arc<dyn Fn(ValidationFailure) -> BoxFuture<'static, Response<Bytes>> + Send + Sync>;

/// Wraps a handler with body and query validation for one route.
///
/// Each call runs one request through [`Stage`]s in order. Body is validated before
/// query; the first failure short-circuits and the handler is not invoked. Route
/// parameters are passed through untouched.
///
/// There is no timeout: a handler future that never completes keeps its request pending.
#[derive(Clone)]
pub struct TypedHandler {
    route: TypedRoute,
    handler: BoxedHandler,
    on_validation_error: Option<BoxedOverride>,
}

impl TypedHandler {
    /// Wrap `handler` for `route`.
    pub fn new<F, Fut>(route: TypedRoute, handler: F) -> Self
    where
        F: Fn(HandlerArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response<Bytes>> + Send + 'static,
    {
        TypedHandler {
            route,
            handler: Arc::new(move |args| handler(args).boxed()),
            on_validation_error: None,
        }
    }

    /// Replace the default 400 response for validation failures.
    #[must_use]
    pub fn on_validation_error<F, Fut>(mut self, on_error: F) -> Self
    where
        F: Fn(ValidationFailure) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response<Bytes>> + Send + 'static,
    {
        self.on_validation_error = Some(Arc::new(move |failure| on_error(failure).boxed()));
        self
    }

    #[must_use]
    pub fn route(&self) -> &TypedRoute {
        &self.route
    }

    /// Run a request through the pipeline with parameters from the host router.
    pub async fn call(&self, request: Request<Bytes>, params: ParamMap) -> Response<Bytes> {
        self.enter(Stage::Receive);
        let (body, query) = match self.validate(&request) {
            Ok(validated) => validated,
            Err(failure) => return self.error_respond(failure).await,
        };

        self.enter(Stage::ResolveParams);
        let args = HandlerArgs {
            request,
            body,
            query,
            params,
        };

        self.enter(Stage::Invoke);
        let response = (self.handler)(args).await;
        self.enter(Stage::Respond);
        response
    }

    /// Like [`call`](Self::call), resolving parameters by matching the request path
    /// against the route's own pattern. A path that does not match yields no parameters.
    pub async fn call_matched(&self, request: Request<Bytes>) -> Response<Bytes> {
        let params = self
            .route
            .pattern()
            .match_path(request.uri().path())
            .unwrap_or_default();
        self.call(request, params).await
    }

    /// Decode and validate body and query, body first.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationFailure`] encountered.
    pub fn validate(&self, request: &Request<Bytes>) -> Result<(Value, Value), ValidationFailure> {
        let contract = self.route.contract();

        self.enter(Stage::DetectBodyFormat);
        let format = detect_body_format(request.headers());
        debug!(route = %self.route.pattern(), format = ?format, "body format selected");

        // Without a body validator the payload is never looked at, malformed or not.
        let body = match contract.body_validator() {
            Some(validator) => {
                self.enter(Stage::ParseBody);
                let raw_body =
                    parse_body(format, request.body()).map_err(|issues| ValidationFailure {
                        source: InputSource::Body,
                        issues,
                    })?;

                self.enter(Stage::ValidateBody);
                run_validator(Some(validator), &raw_body, InputSource::Body)?
            }
            None => Value::Object(Map::new()),
        };

        self.enter(Stage::ParseQuery);
        let raw_query = parse_query(request.uri().query());

        self.enter(Stage::ValidateQuery);
        let query = run_validator(contract.query_validator(), &raw_query, InputSource::Query)?;

        Ok((body, query))
    }

    async fn error_respond(&self, failure: ValidationFailure) -> Response<Bytes> {
        self.enter(Stage::ErrorRespond);
        info!(
            route = %self.route.pattern(),
            source = %failure.source,
            issues = failure.issues.len(),
            "request rejected by schema validation"
        );
        match &self.on_validation_error {
            Some(on_error) => on_error(failure).await,
            None => default_error_response(&failure),
        }
    }

    fn enter(&self, stage: Stage) {
        debug!(route = %self.route.pattern(), stage = ?stage, "request pipeline");
    }
}

impl fmt::Debug for TypedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedHandler")
            .field("route", &self.route)
            .field("on_validation_error", &self.on_validation_error.is_some())
            .finish_non_exhaustive()
    }
}

/// Without a validator the input is not used at all and defaults to `{}`.
fn run_validator(
    validator: Option<&dyn Validator>,
    raw: &Value,
    source: InputSource,
) -> Result<Value, ValidationFailure> {
    match validator {
        Some(v) => v
            .parse(raw)
            .map_err(|issues| ValidationFailure { source, issues }),
        None => Ok(Value::Object(Map::new())),
    }
}

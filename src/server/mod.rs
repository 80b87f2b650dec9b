//! # Server Module
//!
//! The server side of a route contract: a [`TypedHandler`] sits between the host HTTP
//! stack and a user handler, decoding and validating the request before the handler
//! ever sees it.
//!
//! ## Pipeline
//!
//! ```text
//! Receive → DetectBodyFormat → ParseBody → ValidateBody → ParseQuery
//!         → ValidateQuery → ResolveParams → Invoke → Respond
//!                      (any validation failure) → ErrorRespond
//! ```
//!
//! - JSON bodies are parsed as JSON, urlencoded bodies as key/value pairs; anything else,
//!   and any empty body, becomes `{}`.
//! - The body is validated before the query. The first failure ends the request with
//!   either the override response or a 400 `{message, description}`.
//! - Route parameters are passed through as the host router resolved them, or matched
//!   from the route's own pattern via [`TypedHandler::call_matched`].
//!
//! Requests and responses are plain [`http`] types with [`bytes::Bytes`] bodies so the
//! handler can be mounted in any server.
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use serde_json::json;
//! use typedroute::route::TypedRoute;
//! use typedroute::schema::{JsonSchemaValidator, SchemaContract};
//! use typedroute::server::TypedHandler;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let contract = SchemaContract::new().body(
//!     JsonSchemaValidator::new(&json!({"type": "object", "required": ["name"]})).unwrap(),
//! );
//! let route = TypedRoute::new("/api/users", contract).unwrap();
//! let handler = TypedHandler::new(route, |args| async move {
//!     Response::new(Bytes::from(args.body.to_string()))
//! });
//!
//! let req = Request::post("/api/users")
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(b"{}"))
//!     .unwrap();
//! let res = handler.call_matched(req).await;
//! assert_eq!(res.status(), 400);
//! # }
//! ```

mod handler;
mod request;
mod response;

pub use handler::{HandlerArgs, InputSource, Stage, TypedHandler, ValidationFailure};
pub use request::{
    detect_body_format, is_json_media_type, media_type_essence, parse_body, parse_query,
    BodyFormat,
};
pub use response::{
    default_error_response, json_response, ErrorBody, INVALID_BODY_MESSAGE,
    INVALID_QUERY_MESSAGE,
};

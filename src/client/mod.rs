//! # Client Module
//!
//! Calls a route from the caller's side using the same [`TypedRoute`](crate::route::TypedRoute)
//! the server handler was built from.
//!
//! A call goes through three steps:
//!
//! 1. [`resolve_endpoint`] builds the concrete path from the route pattern and params, then
//!    appends the query string. A missing parameter fails here, before any I/O.
//! 2. [`perform_request`] hands one request to a [`Transport`]. `GET` carries no body;
//!    other methods send the body as JSON.
//! 3. [`transform_response`] decodes the body and validates it against the contract's
//!    `output` schema (2xx) or `error` schema (anything else).
//!
//! Business failures come back as [`ClientResult::Failure`]. A body that violates the
//! route's own declared schema is a [`ClientError::ContractViolation`] naming the route.
//! There is no retry or backoff.
//!
//! ```rust,no_run
//! use serde_json::json;
//! use typedroute::client::Client;
//! use typedroute::route::TypedRoute;
//! use typedroute::schema::{JsonSchemaValidator, SchemaContract};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let route = TypedRoute::new(
//!     "/api/projects/[id]",
//!     SchemaContract::new().output(JsonSchemaValidator::new(&json!({"type": "object"}))?),
//! )?;
//! let client = Client::with_base_url("http://localhost:3000")?;
//! let result = client.get(&route).param("id", "42").send().await?;
//! if let Some(project) = result.data() {
//!     println!("{project}");
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod endpoint;
mod error;
mod response;
mod transport;

pub use builder::{Client, RequestBuilder};
pub use endpoint::{resolve_endpoint, QueryMap, QueryValue};
pub use error::{ClientError, ResponseKind};
pub use response::{decode_body, transform_response, ClientResult};
pub use transport::{perform_request, ClientRequest, RawResponse, ReqwestTransport, Transport};

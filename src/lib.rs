//! # typedroute
//!
//! **typedroute** gives file-routed web applications end-to-end schema safety: route
//! parameters come from the route's path pattern, request and response payloads are
//! validated against one shared contract, and a client builds its calls from that same
//! contract.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Parse, build and match bracketed route patterns (`/files/[...slug]`)
//! - **[`schema`]** - Validators and the four-slot [`SchemaContract`](schema::SchemaContract)
//! - **[`route`]** - A pattern bound to its contract
//! - **[`server`]** - Request pipeline: body and query decoding, validation, dispatch, 400s
//! - **[`client`]** - Endpoint construction, transport, response validation
//! - **[`registry`]** - Route discovery on disk, declaration artifact, live regeneration
//! - **[`config`]** - Registry settings and the debug toggle
//! - **[`logging`]** - `tracing` subscriber setup for binaries
//! - **[`cli`]** - The `typedroute` command line
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host router
//!     participant Handler as server::TypedHandler
//!     participant Contract as schema::SchemaContract
//!     participant User as User handler
//!
//!     Host->>Handler: call(request, params)
//!     Handler->>Handler: detect body format, parse body
//!     Handler->>Contract: body.parse(raw body)
//!     alt invalid body
//!         Handler-->>Host: 400 {message, description}
//!     end
//!     Handler->>Contract: query.parse(raw query)
//!     alt invalid query
//!         Handler-->>Host: 400 {message, description}
//!     end
//!     Handler->>User: HandlerArgs {body, query, params}
//!     User-->>Handler: response
//!     Handler-->>Host: response (unmodified)
//! ```
//!
//! ### Registry Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant FS as File System
//!     participant Gen as registry::RegistryGenerator
//!     participant Shared as registry::SharedRegistry
//!     participant Reader as Route / Client
//!
//!     Gen->>FS: walk source root
//!     Gen->>Gen: normalize, sort, dedupe
//!     Gen->>FS: write routes.d.ts (only if changed)
//!     Gen->>Shared: swap in new snapshot
//!     Reader->>Shared: load()
//!     FS-->>Gen: change notification (development)
//!     Gen->>Gen: full pass again
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use typedroute::pattern::{ParamMap, RoutePattern};
//!
//! let pattern = RoutePattern::parse("/api/[name]/hello/[id]").unwrap();
//! assert_eq!(pattern.param_shape().len(), 2);
//!
//! let path = pattern
//!     .build(&ParamMap::new().with("name", "ada").with("id", "7"))
//!     .unwrap();
//! assert_eq!(path, "/api/ada/hello/7");
//!
//! let params = pattern.match_path(&path).unwrap();
//! assert_eq!(serde_json::to_value(&params).unwrap(), json!({"name": "ada", "id": "7"}));
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod pattern;
pub mod registry;
pub mod route;
pub mod schema;
pub mod server;

pub use client::{Client, ClientError, ClientResult};
pub use pattern::{ParamMap, RoutePattern};
pub use registry::{RegistrySnapshot, SharedRegistry};
pub use route::TypedRoute;
pub use schema::SchemaContract;
pub use server::TypedHandler;

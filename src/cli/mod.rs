//! # CLI Module
//!
//! Command-line front-end for the route registry and the path pattern engine.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Run one discovery pass and write the declaration artifact:
//!
//! ```bash
//! typedroute generate --project-root .
//! ```
//!
//! ### `watch`
//!
//! Run one pass, then regenerate on every change under the source root until Ctrl-C:
//!
//! ```bash
//! typedroute watch --project-root web
//! ```
//!
//! ### `routes`
//!
//! Print every registered pattern with its parameter shape (`--json` for machine output).
//!
//! ### `resolve`
//!
//! Build a concrete endpoint from a pattern:
//!
//! ```bash
//! typedroute resolve '/files/[...slug]' --param slug=a --param slug=b --query v=2
//! # /files/a/b?v=2
//! ```
//!
//! ### `match`
//!
//! Match a concrete path and print the parameters as JSON:
//!
//! ```bash
//! typedroute match '/api/[name]/hello/[id]' /api/ada/hello/7
//! # {"id":"7","name":"ada"}
//! ```
//!
//! ## Project Options
//!
//! `generate`, `watch` and `routes` accept `--project-root`, `--config <FILE>`,
//! `--legacy` and `--mode`. Without `--config`, a `typedroute.toml` at the project root
//! is used when present. Flags override the file and `TYPEDROUTE_*` variables.

mod commands;

pub use commands::{
    load_config, match_command, resolve_command, routes_listing, run_cli, Cli, Commands,
    ProjectArgs,
};

//! # Registry Module
//!
//! Discovers route definitions on disk and publishes them as an immutable
//! [`RegistrySnapshot`], together with a TypeScript declaration artifact.
//!
//! ## Layouts
//!
//! - **Modern** (default): every file whose stem is the marker (`route.ts`, `route.js`, …)
//!   is a route at its directory path. `_private` directories hide their subtree and
//!   `(group)` directories are left out of the pattern.
//! - **Legacy**: every file under `<source root>/api` is a route, addressed by its path
//!   relative to that directory, extension dropped.
//!
//! ## Passes
//!
//! A pass discovers, normalizes, sorts and deduplicates entries, writes the declaration
//! file, makes sure the project references it, and then swaps the new snapshot into the
//! [`SharedRegistry`]. Readers always see a complete snapshot. Artifacts are only
//! rewritten when their content changes, so repeated passes over an unchanged tree are
//! free of side effects.
//!
//! In development mode [`RegistryGenerator::start`] keeps a [`RegistryWatcher`] running,
//! which reruns the pass on every filesystem change under the source root.
//!
//! ```rust,no_run
//! use typedroute::config::{Mode, RegistryConfig};
//! use typedroute::registry::RegistryGenerator;
//!
//! # fn main() -> Result<(), typedroute::registry::RegistryError> {
//! let config = RegistryConfig { mode: Mode::Production, ..RegistryConfig::new(".") };
//! let handle = RegistryGenerator::new(config)?.start()?;
//! for pattern in handle.snapshot().patterns() {
//!     println!("{pattern}");
//! }
//! # Ok(())
//! # }
//! ```

mod discovery;
mod emit;
mod error;
mod generator;
mod normalize;
mod snapshot;
mod watch;

pub use discovery::{discover, resolve_source_root};
pub use emit::{
    emit, ensure_reference_file, ensure_tsconfig_include, render_declaration, write_if_changed,
    DeclarationTemplate, EmitReport,
};
pub use error::RegistryError;
pub use generator::{RegistryGenerator, RegistryHandle};
pub use normalize::{is_group_segment, is_private_segment, normalize_route_path, strip_extension};
pub use snapshot::{RegistryEntry, RegistrySnapshot, SharedRegistry};
pub use watch::RegistryWatcher;

use crate::config::RegistryConfig;

/// Resolve the source root, run the first pass and, in development mode, start watching.
///
/// # Errors
///
/// Returns [`RegistryError::SourceRootMissing`] when no source root exists, or the
/// error of the first pass.
pub fn start(config: RegistryConfig) -> Result<RegistryHandle, RegistryError> {
    RegistryGenerator::new(config)?.start()
}

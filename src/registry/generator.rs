use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::discovery::{discover, resolve_source_root};
use super::emit::emit;
use super::error::RegistryError;
use super::snapshot::{RegistrySnapshot, SharedRegistry};
use super::watch::RegistryWatcher;
use crate::config::{debug_enabled, RegistryConfig};

/// Runs discovery and emission passes and publishes each result to a [`SharedRegistry`].
#[derive(Debug)]
pub struct RegistryGenerator {
    config: RegistryConfig,
    source_root: PathBuf,
    shared: SharedRegistry,
}

impl RegistryGenerator {
    /// Resolve the source root for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SourceRootMissing`] when no candidate root exists.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let source_root = resolve_source_root(&config.candidate_roots())?;
        info!(
            source_root = %source_root.display(),
            legacy = config.legacy,
            mode = %config.mode,
            "route registry source root resolved"
        );
        Ok(RegistryGenerator {
            config,
            source_root,
            shared: SharedRegistry::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Handle readers use to load the latest snapshot.
    #[must_use]
    pub fn shared(&self) -> SharedRegistry {
        self.shared.clone()
    }

    /// Discover routes, write artifacts and publish the new snapshot.
    ///
    /// Running twice on an unchanged tree yields the same snapshot and leaves the
    /// artifacts untouched.
    ///
    /// # Errors
    ///
    /// Returns the first discovery or emission error; the previous snapshot stays published.
    pub fn run_once(&self) -> Result<Arc<RegistrySnapshot>, RegistryError> {
        let entries = discover(&self.source_root, &self.config)?;
        let generation = self.shared.load().generation() + 1;
        let snapshot = RegistrySnapshot::from_entries(entries).with_generation(generation);

        let report = emit(&snapshot, &self.config)?;
        let snapshot = self.shared.store(snapshot);

        if debug_enabled() {
            info!(
                generation,
                routes = ?snapshot.patterns().collect::<Vec<_>>(),
                "route registry regenerated"
            );
        } else {
            debug!(
                generation,
                routes = snapshot.len(),
                changed = report.changed(),
                "route registry regenerated"
            );
        }
        Ok(snapshot)
    }

    /// Run one pass, then keep regenerating on change in development mode.
    ///
    /// # Errors
    ///
    /// Returns the error of the first pass, or [`RegistryError::Watch`] if watching fails.
    pub fn start(self) -> Result<RegistryHandle, RegistryError> {
        let snapshot = self.run_once()?;
        info!(routes = snapshot.len(), mode = %self.config.mode, "route registry generated");

        let shared = self.shared();
        let watcher = if self.config.mode.watches() {
            Some(RegistryWatcher::spawn(Arc::new(self))?)
        } else {
            None
        };
        Ok(RegistryHandle { shared, watcher })
    }
}

/// A started generator. Dropping it stops watching.
#[derive(Debug)]
pub struct RegistryHandle {
    shared: SharedRegistry,
    watcher: Option<RegistryWatcher>,
}

impl RegistryHandle {
    #[must_use]
    pub fn shared(&self) -> SharedRegistry {
        self.shared.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.shared.load()
    }

    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }
}

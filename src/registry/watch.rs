use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::error::RegistryError;
use super::generator::RegistryGenerator;

/// Events arriving within this window of each other trigger a single pass.
const DEBOUNCE: Duration = Duration::from_millis(50);

/// Watches the source root and reruns the generator on every change.
///
/// Regeneration happens on one dedicated thread, which is the only writer of the
/// shared snapshot after startup. Dropping the watcher stops the thread.
pub struct RegistryWatcher {
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
}

impl RegistryWatcher {
    /// Start watching `generator`'s source root recursively.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Watch`] if the watcher cannot be created, or
    /// [`RegistryError::Io`] if the worker thread cannot be spawned.
    pub fn spawn(generator: Arc<RegistryGenerator>) -> Result<Self, RegistryError> {
        let (tx, rx) = mpsc::channel::<Event>();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Access(_)) && tx.send(event).is_err() {
                        debug!("registry worker gone; dropping filesystem event");
                    }
                }
                Err(e) => warn!(error = %e, "filesystem watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(generator.source_root(), RecursiveMode::Recursive)?;

        let root = generator.source_root().to_path_buf();
        let worker = std::thread::Builder::new()
            .name("typedroute-registry".to_string())
            .spawn(move || regenerate_loop(&generator, &rx))
            .map_err(|e| RegistryError::io(&root, e))?;

        info!(source_root = %root.display(), "watching route sources");
        Ok(RegistryWatcher {
            watcher: Some(watcher),
            worker: Some(worker),
        })
    }
}

/// Block on events until the sender side (owned by the notify watcher) is dropped.
fn regenerate_loop(generator: &RegistryGenerator, rx: &mpsc::Receiver<Event>) {
    while let Ok(first) = rx.recv() {
        let mut coalesced = 1usize;
        while rx.recv_timeout(DEBOUNCE).is_ok() {
            coalesced += 1;
        }
        debug!(paths = ?first.paths, events = coalesced, "route sources changed");

        match generator.run_once() {
            Ok(snapshot) => info!(
                routes = snapshot.len(),
                generation = snapshot.generation(),
                "route registry regenerated"
            ),
            Err(e) => error!(error = %e, "route registry regeneration failed; keeping previous snapshot"),
        }
    }
    debug!("registry watcher stopped");
}

impl std::fmt::Debug for RegistryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryWatcher")
            .field("running", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for RegistryWatcher {
    fn drop(&mut self) {
        // Dropping the notify watcher drops the channel sender, which ends the loop.
        drop(self.watcher.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("registry worker panicked");
            }
        }
    }
}

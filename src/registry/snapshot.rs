use arc_swap::ArcSwap;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// One discovered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// Normalized pattern, e.g. `/api/projects/[id]`
    pub pattern: String,
    /// File the route was discovered from
    pub source: PathBuf,
}

/// Every registered route at one point in time, sorted by pattern.
///
/// Snapshots are never modified; a regeneration builds a new one and swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    entries: Vec<RegistryEntry>,
    #[serde(skip)]
    generation: u64,
}

impl RegistrySnapshot {
    /// Sort by pattern and drop duplicates, keeping the entry with the smallest source path.
    #[must_use]
    pub fn from_entries(mut entries: Vec<RegistryEntry>) -> Self {
        entries.sort_by(|a, b| a.pattern.cmp(&b.pattern).then_with(|| a.source.cmp(&b.source)));
        entries.dedup_by(|later, earlier| later.pattern == earlier.pattern);
        RegistrySnapshot {
            entries,
            generation: 0,
        }
    }

    #[must_use]
    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// How many passes produced a snapshot before this one; 0 for a fresh registry.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.get(pattern).is_some()
    }

    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&RegistryEntry> {
        self.entries
            .binary_search_by(|e| e.pattern.as_str().cmp(pattern))
            .ok()
            .map(|i| &self.entries[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    /// Same routes, ignoring the generation counter.
    #[must_use]
    pub fn same_routes(&self, other: &RegistrySnapshot) -> bool {
        self.entries == other.entries
    }
}

/// Process-wide handle to the latest snapshot.
///
/// Readers get a complete snapshot with [`load`](Self::load); the generator replaces it
/// wholesale with [`store`](Self::store). No lock is held by either side.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    current: Arc<ArcSwap<RegistrySnapshot>>,
}

impl SharedRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest complete snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    pub(crate) fn store(&self, snapshot: RegistrySnapshot) -> Arc<RegistrySnapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pattern: &str, source: &str) -> RegistryEntry {
        RegistryEntry {
            pattern: pattern.to_string(),
            source: PathBuf::from(source),
        }
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let snapshot = RegistrySnapshot::from_entries(vec![
            entry("/b", "b/route.ts"),
            entry("/a", "(x)/a/route.ts"),
            entry("/a", "a/route.ts"),
            entry("/", "route.ts"),
        ]);
        assert_eq!(snapshot.patterns().collect::<Vec<_>>(), vec!["/", "/a", "/b"]);
        assert_eq!(
            snapshot.get("/a").unwrap().source,
            PathBuf::from("(x)/a/route.ts")
        );
        assert!(snapshot.contains("/b"));
        assert!(!snapshot.contains("/c"));
    }

    #[test]
    fn test_shared_swap() {
        let shared = SharedRegistry::new();
        let before = shared.load();
        assert!(before.is_empty());

        shared.store(
            RegistrySnapshot::from_entries(vec![entry("/x", "x/route.ts")]).with_generation(1),
        );
        assert!(before.is_empty());
        let after = shared.load();
        assert_eq!(after.len(), 1);
        assert_eq!(after.generation(), 1);
    }
}

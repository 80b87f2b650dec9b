use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::error::RegistryError;
use super::normalize::{is_private_segment, normalize_route_path, strip_extension};
use super::snapshot::RegistryEntry;
use crate::config::RegistryConfig;
use crate::pattern::RoutePattern;

/// First candidate that exists on disk.
///
/// # Errors
///
/// Returns [`RegistryError::SourceRootMissing`] when none exists.
pub fn resolve_source_root(candidates: &[PathBuf]) -> Result<PathBuf, RegistryError> {
    candidates
        .iter()
        .find(|c| c.is_dir())
        .cloned()
        .ok_or_else(|| RegistryError::SourceRootMissing {
            candidates: candidates.to_vec(),
        })
}

/// Discover route entries under `source_root` using the layout `config` selects.
///
/// Entries come back in walk order; the snapshot sorts and deduplicates them.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] when the tree cannot be read.
pub fn discover(
    source_root: &Path,
    config: &RegistryConfig,
) -> Result<Vec<RegistryEntry>, RegistryError> {
    if config.legacy {
        discover_legacy(&source_root.join(&config.legacy_dir))
    } else {
        discover_modern(source_root, &config.marker)
    }
}

fn is_private_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(is_private_segment)
}

/// Files whose stem is `marker`, anywhere below `root` outside private directories.
fn discover_modern(root: &Path, marker: &str) -> Result<Vec<RegistryEntry>, RegistryError> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_private_dir(e));

    for item in walker {
        let item = item.map_err(|e| walk_error(root, e))?;
        if !item.file_type().is_file() {
            continue;
        }
        let is_marker = item
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem == marker);
        if !is_marker {
            continue;
        }
        if let Some(entry) = make_entry(root, item.path(), Some(marker)) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Every file under `dir`, addressed by its path relative to `dir` without extension.
fn discover_legacy(dir: &Path) -> Result<Vec<RegistryEntry>, RegistryError> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "legacy route directory does not exist");
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for item in WalkDir::new(dir).sort_by_file_name() {
        let item = item.map_err(|e| walk_error(dir, e))?;
        if !item.file_type().is_file() {
            continue;
        }
        if let Some(entry) = make_entry(dir, item.path(), None) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Normalize one discovered file into an entry. Files whose path is not valid UTF-8 or
/// not a valid pattern are skipped.
fn make_entry(root: &Path, file: &Path, marker: Option<&str>) -> Option<RegistryEntry> {
    let relative = file.strip_prefix(root).ok()?;
    let Some(relative_str) = relative.to_str() else {
        warn!(file = %file.display(), "skipping route file with non UTF-8 path");
        return None;
    };

    let raw = match marker {
        Some(_) => normalize_route_path(relative_str, marker),
        None => normalize_route_path(strip_extension(relative_str), None),
    };

    match RoutePattern::parse(&raw) {
        Ok(pattern) => {
            debug!(pattern = %pattern, file = %relative.display(), "route discovered");
            Some(RegistryEntry {
                pattern: pattern.as_str().to_string(),
                source: relative.to_path_buf(),
            })
        }
        Err(e) => {
            warn!(file = %relative.display(), error = %e, "skipping route with invalid pattern");
            None
        }
    }
}

fn walk_error(root: &Path, e: walkdir::Error) -> RegistryError {
    let path = e.path().unwrap_or(root).to_path_buf();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    RegistryError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {}\n").unwrap();
    }

    fn patterns(entries: &[RegistryEntry]) -> Vec<&str> {
        let mut p: Vec<&str> = entries.iter().map(|e| e.pattern.as_str()).collect();
        p.sort_unstable();
        p
    }

    #[test]
    fn test_resolve_first_existing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        let candidates = vec![dir.path().join("src/app"), dir.path().join("app")];
        assert_eq!(resolve_source_root(&candidates).unwrap(), dir.path().join("app"));
    }

    #[test]
    fn test_resolve_missing() {
        let dir = TempDir::new().unwrap();
        let err = resolve_source_root(&[dir.path().join("nope")]).unwrap_err();
        assert!(matches!(err, RegistryError::SourceRootMissing { .. }));
    }

    #[test]
    fn test_modern_discovery() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "api/route.ts");
        touch(root, "api/projects/[id]/route.ts");
        touch(root, "api/(admin)/users/route.js");
        touch(root, "api/_internal/secret/route.ts");
        touch(root, "docs/[[...slug]]/route.ts");
        touch(root, "projects/[id]/page.tsx");
        touch(root, "api/route.test.ts");

        let entries = discover_modern(root, "route").unwrap();
        assert_eq!(
            patterns(&entries),
            vec!["/api", "/api/projects/[id]", "/api/users", "/docs/[[...slug]]"]
        );
    }

    #[test]
    fn test_modern_skips_invalid_patterns() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "files/[...rest]/more/route.ts");
        touch(dir.path(), "ok/route.ts");
        let entries = discover_modern(dir.path(), "route").unwrap();
        assert_eq!(patterns(&entries), vec!["/ok"]);
    }

    #[test]
    fn test_legacy_discovery() {
        let dir = TempDir::new().unwrap();
        let api = dir.path().join("api");
        touch(&api, "users.ts");
        touch(&api, "users/[id].ts");
        touch(&api, "index.js");

        let entries = discover_legacy(&api).unwrap();
        assert_eq!(patterns(&entries), vec!["/index", "/users", "/users/[id]"]);
    }
}

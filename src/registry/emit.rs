use askama::Template;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

use super::error::RegistryError;
use super::snapshot::RegistrySnapshot;
use crate::config::RegistryConfig;

/// Declaration artifact: one `RoutesConfig` key per registered pattern.
#[derive(Template)]
#[template(path = "routes.d.ts", escape = "none")]
pub struct DeclarationTemplate {
    /// Patterns as quoted string literals
    pub keys: Vec<String>,
}

impl DeclarationTemplate {
    #[must_use]
    pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Self {
        DeclarationTemplate {
            keys: snapshot
                .patterns()
                .map(|p| Value::String(p.to_string()).to_string())
                .collect(),
        }
    }
}

/// What one emission pass changed on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub declaration_written: bool,
    pub reference_created: bool,
    pub tsconfig_updated: bool,
}

impl EmitReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.declaration_written || self.reference_created || self.tsconfig_updated
    }
}

/// Render the declaration artifact for `snapshot`.
///
/// # Errors
///
/// Returns [`RegistryError::Render`] if the template fails.
pub fn render_declaration(snapshot: &RegistrySnapshot) -> Result<String, RegistryError> {
    Ok(DeclarationTemplate::from_snapshot(snapshot).render()?)
}

/// Write the declaration artifact, the reference file and the tsconfig include.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] or [`RegistryError::Render`] on failure.
pub fn emit(
    snapshot: &RegistrySnapshot,
    config: &RegistryConfig,
) -> Result<EmitReport, RegistryError> {
    let rendered = render_declaration(snapshot)?;
    let declaration_written = write_if_changed(&config.declaration_path(), &rendered)?;
    let reference_created = ensure_reference_file(config)?;
    let tsconfig_updated = ensure_tsconfig_include(config)?;
    Ok(EmitReport {
        declaration_written,
        reference_created,
        tsconfig_updated,
    })
}

/// Atomically replace `path` with `content`, doing nothing if it already holds exactly that.
///
/// Returns whether the file was written.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the directory or file cannot be written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool, RegistryError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        debug!(path = %path.display(), "artifact unchanged");
        return Ok(false);
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RegistryError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| RegistryError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| RegistryError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| RegistryError::io(path, e.error))?;
    Ok(true)
}

/// How the reference file points at the declaration artifact.
fn reference_target(config: &RegistryConfig) -> String {
    let declaration = config.output_dir.join(&config.declaration_file);
    let text = declaration.to_string_lossy().replace('\\', "/");
    if declaration.is_absolute() || text.starts_with("./") || text.starts_with("../") {
        text
    } else {
        format!("./{text}")
    }
}

/// Create the reference file once. An existing file is never touched.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be created.
pub fn ensure_reference_file(config: &RegistryConfig) -> Result<bool, RegistryError> {
    let path = config.reference_path();
    if path.exists() {
        return Ok(false);
    }
    let content = format!("/// <reference path=\"{}\" />\n", reference_target(config));
    write_if_changed(&path, &content)?;
    info!(path = %path.display(), "created route reference file");
    Ok(true)
}

/// Append the reference file to the tsconfig `include` list unless already present.
///
/// A missing tsconfig is left alone; one that is not plain JSON (comments, trailing
/// commas) is reported and skipped.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be read or written.
pub fn ensure_tsconfig_include(config: &RegistryConfig) -> Result<bool, RegistryError> {
    let path = config.tsconfig_path();
    if !path.exists() {
        return Ok(false);
    }
    let text = fs::read_to_string(&path).map_err(|e| RegistryError::io(&path, e))?;
    let mut tsconfig: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "tsconfig is not plain JSON; add the reference file to `include` by hand");
            return Ok(false);
        }
    };

    let Some(object) = tsconfig.as_object_mut() else {
        warn!(path = %path.display(), "tsconfig root is not an object");
        return Ok(false);
    };
    let include = object
        .entry("include")
        .or_insert_with(|| Value::Array(Vec::new()));
    let Some(list) = include.as_array_mut() else {
        warn!(path = %path.display(), "tsconfig `include` is not an array");
        return Ok(false);
    };

    let reference = config.reference_file.as_str();
    if list.iter().any(|v| v.as_str() == Some(reference)) {
        return Ok(false);
    }
    list.push(Value::String(reference.to_string()));

    let mut updated = serde_json::to_string_pretty(&tsconfig)
        .map_err(|e| RegistryError::io(&path, e.into()))?;
    updated.push('\n');
    write_if_changed(&path, &updated)?;
    info!(path = %path.display(), include = reference, "added route reference to tsconfig");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryEntry;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn snapshot(patterns: &[&str]) -> RegistrySnapshot {
        RegistrySnapshot::from_entries(
            patterns
                .iter()
                .map(|p| RegistryEntry {
                    pattern: p.to_string(),
                    source: PathBuf::from("route.ts"),
                })
                .collect(),
        )
    }

    #[test]
    fn test_render_declaration() {
        let text = render_declaration(&snapshot(&["/api/[id]", "/api"])).unwrap();
        assert!(text.contains("interface RoutesConfig {"));
        assert!(text.contains("\t\t\"/api\": {};\n\t\t\"/api/[id]\": {};"));
        assert!(text.find("\"/api\"").unwrap() < text.find("\"/api/[id]\"").unwrap());
        assert!(text.contains("export {};"));
    }

    #[test]
    fn test_render_empty() {
        let text = render_declaration(&RegistrySnapshot::default()).unwrap();
        assert!(text.contains("interface RoutesConfig {\n\t}"));
    }

    #[test]
    fn test_write_if_changed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.txt");
        assert!(write_if_changed(&path, "a").unwrap());
        assert!(!write_if_changed(&path, "a").unwrap());
        assert!(write_if_changed(&path, "b").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "b");
    }

    #[test]
    fn test_reference_created_once() {
        let dir = TempDir::new().unwrap();
        let config = RegistryConfig::new(dir.path());
        assert!(ensure_reference_file(&config).unwrap());
        let text = fs::read_to_string(config.reference_path()).unwrap();
        assert_eq!(text, "/// <reference path=\"./.typedroute/routes.d.ts\" />\n");

        fs::write(config.reference_path(), "// mine\n").unwrap();
        assert!(!ensure_reference_file(&config).unwrap());
        assert_eq!(fs::read_to_string(config.reference_path()).unwrap(), "// mine\n");
    }

    #[test]
    fn test_tsconfig_append_once() {
        let dir = TempDir::new().unwrap();
        let config = RegistryConfig::new(dir.path());
        fs::write(
            config.tsconfig_path(),
            r#"{"compilerOptions": {"strict": true}, "include": ["next-env.d.ts"]}"#,
        )
        .unwrap();

        assert!(ensure_tsconfig_include(&config).unwrap());
        assert!(!ensure_tsconfig_include(&config).unwrap());

        let value: Value =
            serde_json::from_str(&fs::read_to_string(config.tsconfig_path()).unwrap()).unwrap();
        assert_eq!(
            value["include"],
            serde_json::json!(["next-env.d.ts", "routes-env.d.ts"])
        );
        assert_eq!(value["compilerOptions"]["strict"], true);
    }

    #[test]
    fn test_tsconfig_without_include() {
        let dir = TempDir::new().unwrap();
        let config = RegistryConfig::new(dir.path());
        fs::write(config.tsconfig_path(), "{}").unwrap();
        assert!(ensure_tsconfig_include(&config).unwrap());
        let value: Value =
            serde_json::from_str(&fs::read_to_string(config.tsconfig_path()).unwrap()).unwrap();
        assert_eq!(value["include"], serde_json::json!(["routes-env.d.ts"]));
    }

    #[test]
    fn test_tsconfig_with_comments_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let config = RegistryConfig::new(dir.path());
        let original = "{\n  // comment\n  \"include\": []\n}\n";
        fs::write(config.tsconfig_path(), original).unwrap();
        assert!(!ensure_tsconfig_include(&config).unwrap());
        assert_eq!(fs::read_to_string(config.tsconfig_path()).unwrap(), original);
    }

    #[test]
    fn test_missing_tsconfig() {
        let dir = TempDir::new().unwrap();
        assert!(!ensure_tsconfig_include(&RegistryConfig::new(dir.path())).unwrap());
    }
}

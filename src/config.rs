//! # Configuration Module
//!
//! Settings for the route registry generator, plus the process-wide debug toggle.
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults ([`RegistryConfig::default`])
//! 2. A TOML file ([`RegistryConfig::from_file`])
//! 3. Environment variables ([`RegistryConfig::apply_env`])
//! 4. Command-line flags (applied by the CLI)
//!
//! ## Environment Variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `TYPEDROUTE_MODE` | `production` or `development` |
//! | `TYPEDROUTE_LEGACY` | `true` selects the legacy discovery layout |
//! | `TYPEDROUTE_PROJECT_ROOT` | Project root directory |
//! | `TYPEDROUTE_DEBUG` | `true` logs resolved endpoints and registry contents at `info` |
//!
//! ## Example File
//!
//! ```toml
//! project_root = "."
//! mode = "production"
//! legacy = false
//! source_roots = ["src/app", "app"]
//! output_dir = ".typedroute"
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::registry::RegistryError;

static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| {
    env::var("TYPEDROUTE_DEBUG")
        .map(|v| parse_bool(&v).unwrap_or(false))
        .unwrap_or(false)
});

/// Whether `TYPEDROUTE_DEBUG` is on. Read once per process.
#[must_use]
pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Whether the generator keeps watching the source tree after the first pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One pass, then live regeneration on every change
    #[default]
    Development,
    /// One pass only
    Production,
}

impl Mode {
    #[must_use]
    pub fn watches(self) -> bool {
        matches!(self, Mode::Development)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

/// Route registry generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Directory all other relative paths are resolved against
    pub project_root: PathBuf,
    /// Candidate source roots, first existing one wins. Defaults depend on `legacy`.
    pub source_roots: Option<Vec<PathBuf>>,
    /// Use the legacy layout: every file under `legacy_dir` is a route
    pub legacy: bool,
    /// File stem marking a route definition in the modern layout
    pub marker: String,
    /// Route directory inside the source root for the legacy layout
    pub legacy_dir: String,
    /// Where the declaration artifact is written
    pub output_dir: PathBuf,
    pub declaration_file: String,
    /// File at the project root referencing the declaration artifact
    pub reference_file: String,
    /// Type-check configuration that must include `reference_file`
    pub tsconfig: String,
    pub mode: Mode,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            project_root: PathBuf::from("."),
            source_roots: None,
            legacy: false,
            marker: "route".to_string(),
            legacy_dir: "api".to_string(),
            output_dir: PathBuf::from(".typedroute"),
            declaration_file: "routes.d.ts".to_string(),
            reference_file: "routes-env.d.ts".to_string(),
            tsconfig: "tsconfig.json".to_string(),
            mode: Mode::Development,
        }
    }
}

impl RegistryConfig {
    /// Defaults rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        RegistryConfig {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Load a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be read and
    /// [`RegistryError::Config`] if it is not valid.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
        toml::from_str(&text).map_err(|e| RegistryError::Config {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    }

    /// Apply `TYPEDROUTE_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] for unparsable values.
    pub fn apply_env(self) -> Result<Self, RegistryError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply `TYPEDROUTE_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] for unparsable values.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, RegistryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("TYPEDROUTE_MODE") {
            self.mode = mode.parse().map_err(|message| RegistryError::Config {
                path: None,
                message: format!("TYPEDROUTE_MODE: {message}"),
            })?;
        }
        if let Some(legacy) = lookup("TYPEDROUTE_LEGACY") {
            self.legacy = parse_bool(&legacy).ok_or_else(|| RegistryError::Config {
                path: None,
                message: format!("TYPEDROUTE_LEGACY: expected a boolean, got '{legacy}'"),
            })?;
        }
        if let Some(root) = lookup("TYPEDROUTE_PROJECT_ROOT") {
            self.project_root = PathBuf::from(root);
        }
        Ok(self)
    }

    /// Candidate source roots resolved against the project root, in priority order.
    #[must_use]
    pub fn candidate_roots(&self) -> Vec<PathBuf> {
        let defaults: &[&str] = if self.legacy {
            &["src/pages", "pages"]
        } else {
            &["src/app", "app"]
        };
        match &self.source_roots {
            Some(roots) => roots.iter().map(|r| self.project_root.join(r)).collect(),
            None => defaults.iter().map(|r| self.project_root.join(r)).collect(),
        }
    }

    #[must_use]
    pub fn declaration_path(&self) -> PathBuf {
        self.project_root
            .join(&self.output_dir)
            .join(&self.declaration_file)
    }

    #[must_use]
    pub fn reference_path(&self) -> PathBuf {
        self.project_root.join(&self.reference_file)
    }

    #[must_use]
    pub fn tsconfig_path(&self) -> PathBuf {
        self.project_root.join(&self.tsconfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::new("/proj");
        assert_eq!(
            config.candidate_roots(),
            vec![PathBuf::from("/proj/src/app"), PathBuf::from("/proj/app")]
        );
        assert_eq!(
            config.declaration_path(),
            PathBuf::from("/proj/.typedroute/routes.d.ts")
        );
        assert_eq!(config.mode, Mode::Development);
    }

    #[test]
    fn test_legacy_roots() {
        let config = RegistryConfig {
            legacy: true,
            ..RegistryConfig::new("/proj")
        };
        assert_eq!(
            config.candidate_roots(),
            vec![PathBuf::from("/proj/src/pages"), PathBuf::from("/proj/pages")]
        );
    }

    #[test]
    fn test_toml_partial() {
        let config: RegistryConfig = toml::from_str(
            r#"
            mode = "production"
            source_roots = ["web/routes"]
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.marker, "route");
        assert_eq!(
            config.candidate_roots(),
            vec![PathBuf::from("./web/routes")]
        );
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(toml::from_str::<RegistryConfig>("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TYPEDROUTE_MODE", "prod"),
            ("TYPEDROUTE_LEGACY", "yes"),
            ("TYPEDROUTE_PROJECT_ROOT", "/srv/app"),
        ]
        .into_iter()
        .collect();
        let config = RegistryConfig::default()
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.mode, Mode::Production);
        assert!(config.legacy);
        assert_eq!(config.project_root, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_bad_override() {
        let err = RegistryConfig::default()
            .apply_overrides(|k| (k == "TYPEDROUTE_LEGACY").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Config { .. }));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Production".parse::<Mode>().unwrap(), Mode::Production);
        assert!("staging".parse::<Mode>().is_err());
        assert!(Mode::Development.watches());
        assert!(!Mode::Production.watches());
    }
}

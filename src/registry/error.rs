use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by registry generation.
#[derive(Debug)]
pub enum RegistryError {
    /// None of the candidate source roots exists; generation cannot start
    SourceRootMissing { candidates: Vec<PathBuf> },
    /// Filesystem access failed
    Io { path: PathBuf, source: io::Error },
    /// Invalid configuration value or file
    Config {
        path: Option<PathBuf>,
        message: String,
    },
    /// The declaration artifact could not be rendered
    Render(askama::Error),
    /// The filesystem watcher could not be started
    Watch(notify::Error),
}

impl RegistryError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        RegistryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::SourceRootMissing { candidates } => {
                let list: Vec<String> = candidates
                    .iter()
                    .map(|c| c.display().to_string())
                    .collect();
                write!(
                    f,
                    "could not determine source directory (tried: {})",
                    list.join(", ")
                )
            }
            RegistryError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            RegistryError::Config {
                path: Some(path),
                message,
            } => write!(f, "invalid configuration in {}: {message}", path.display()),
            RegistryError::Config {
                path: None,
                message,
            } => write!(f, "invalid configuration: {message}"),
            RegistryError::Render(e) => write!(f, "failed to render declaration file: {e}"),
            RegistryError::Watch(e) => write!(f, "failed to watch source root: {e}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Io { source, .. } => Some(source),
            RegistryError::Render(e) => Some(e),
            RegistryError::Watch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<askama::Error> for RegistryError {
    fn from(e: askama::Error) -> Self {
        RegistryError::Render(e)
    }
}

impl From<notify::Error> for RegistryError {
    fn from(e: notify::Error) -> Self {
        RegistryError::Watch(e)
    }
}

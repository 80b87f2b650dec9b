use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use crate::client::{resolve_endpoint, QueryMap, QueryValue};
use crate::config::{Mode, RegistryConfig};
use crate::pattern::{ParamKind, ParamMap, RoutePattern};
use crate::registry::{RegistryGenerator, RegistrySnapshot};

/// Name of the optional config file looked up at the project root.
const DEFAULT_CONFIG_FILE: &str = "typedroute.toml";

/// Command-line interface for typedroute
#[derive(Parser)]
#[command(name = "typedroute")]
#[command(about = "Typed route registry and path pattern tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options locating the project and its route sources.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root directory
    #[arg(short, long)]
    pub project_root: Option<PathBuf>,

    /// TOML config file (default: typedroute.toml in the project root, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the legacy layout: every file under <source root>/api is a route
    #[arg(long, default_value_t = false)]
    pub legacy: bool,

    /// development or production
    #[arg(long)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover routes once and write the declaration artifact
    Generate {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Generate, then regenerate on every change until Ctrl-C
    Watch {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Print the registered route patterns
    Routes {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build a concrete endpoint from a pattern
    Resolve {
        /// Route pattern, e.g. /api/projects/[id]
        pattern: String,

        /// Parameter as name=value; repeat a catch-all name once per segment
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Query parameter as key=value; repeated keys become lists
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,
    },
    /// Match a concrete path against a pattern and print its parameters
    Match {
        /// Route pattern
        pattern: String,
        /// Concrete path, e.g. /api/projects/42
        path: String,
    },
}

/// Layer config sources: defaults, file, environment, then flags.
///
/// # Errors
///
/// Fails if an explicit config file cannot be loaded or an override is invalid.
pub fn load_config(args: &ProjectArgs) -> Result<RegistryConfig> {
    let root = args.project_root.clone().unwrap_or_else(|| PathBuf::from("."));
    let file = args
        .config
        .clone()
        .or_else(|| Some(root.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()));

    let mut config = match &file {
        Some(path) => RegistryConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    // A config file found inside the root describes that root.
    if args.config.is_none() || args.project_root.is_some() {
        config.project_root = root;
    }

    let mut config = config.apply_env().context("Invalid TYPEDROUTE_* environment")?;
    if let Some(project_root) = &args.project_root {
        config.project_root.clone_from(project_root);
    }
    if args.legacy {
        config.legacy = true;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    Ok(config)
}

fn split_pair(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{raw}'"))
}

/// Resolve `pattern` with `NAME=VALUE` params and query pairs.
///
/// Catch-all parameters collect every value given for their name.
///
/// # Errors
///
/// Fails on malformed pairs, an invalid pattern or a missing parameter.
pub fn resolve_command(pattern: &str, params: &[String], query: &[String]) -> Result<String> {
    let pattern = RoutePattern::parse(pattern)?;
    let shape = pattern.param_shape();

    let mut map = ParamMap::new();
    let mut sequences: Vec<(String, Vec<String>)> = Vec::new();
    for raw in params {
        let (name, value) = split_pair(raw)?;
        match shape.kind(name) {
            Some(ParamKind::Sequence) => {
                match sequences.iter_mut().find(|(n, _)| n == name) {
                    Some((_, values)) => values.push(value.to_string()),
                    None => sequences.push((name.to_string(), vec![value.to_string()])),
                }
            }
            Some(ParamKind::Scalar) => {
                map.insert(name, value);
            }
            None => bail!("pattern {pattern} has no parameter '{name}'"),
        }
    }
    for (name, values) in sequences {
        map.insert_many(name, values);
    }

    let mut query_map = QueryMap::new();
    let mut pairs: Vec<(String, Vec<String>)> = Vec::new();
    for raw in query {
        let (key, value) = split_pair(raw)?;
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => pairs.push((key.to_string(), vec![value.to_string()])),
        }
    }
    for (key, mut values) in pairs {
        let value = if values.len() == 1 {
            QueryValue::Single(values.remove(0))
        } else {
            QueryValue::Many(values)
        };
        query_map.insert(key, value);
    }

    Ok(resolve_endpoint(&pattern, &map, &query_map)?)
}

/// Match `path` against `pattern` and render the parameters as JSON.
///
/// # Errors
///
/// Fails on an invalid pattern or when the path does not match.
pub fn match_command(pattern: &str, path: &str) -> Result<String> {
    let pattern = RoutePattern::parse(pattern)?;
    let params = pattern
        .match_path(path)
        .ok_or_else(|| anyhow!("{path} does not match {pattern}"))?;
    Ok(serde_json::to_string(&params)?)
}

/// Render a snapshot as one line per route, or as JSON.
#[must_use]
pub fn routes_listing(snapshot: &RegistrySnapshot, as_json: bool) -> String {
    let rows: Vec<(String, String, String)> = snapshot
        .iter()
        .map(|entry| {
            let shape = RoutePattern::parse(&entry.pattern)
                .map(|p| p.param_shape().to_string())
                .unwrap_or_default();
            (
                entry.pattern.clone(),
                shape,
                entry.source.to_string_lossy().replace('\\', "/"),
            )
        })
        .collect();

    if as_json {
        let list: Vec<_> = rows
            .iter()
            .map(|(pattern, params, source)| {
                json!({"pattern": pattern, "params": params, "source": source})
            })
            .collect();
        return serde_json::Value::Array(list).to_string();
    }

    let width = rows.iter().map(|(p, _, _)| p.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(pattern, params, source)| format!("{pattern:<width$}  {params}  ({source})"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute a parsed command.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration cannot be loaded
/// - no source root exists, or a registry pass fails
/// - a pattern is malformed, a parameter is missing, or a path does not match
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate { project } => {
            let config = RegistryConfig {
                mode: Mode::Production,
                ..load_config(&project)?
            };
            let declaration = config.declaration_path();
            let handle = RegistryGenerator::new(config)?.start()?;
            println!(
                "✅ Generated {} routes → {}",
                handle.snapshot().len(),
                declaration.display()
            );
            Ok(())
        }
        Commands::Watch { project } => {
            let config = RegistryConfig {
                mode: Mode::Development,
                ..load_config(&project)?
            };
            let handle = RegistryGenerator::new(config)?.start()?;
            info!(
                routes = handle.snapshot().len(),
                "watching for route changes; press Ctrl-C to stop"
            );

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?;
            runtime
                .block_on(tokio::signal::ctrl_c())
                .context("Failed to listen for Ctrl-C")?;
            drop(handle);
            Ok(())
        }
        Commands::Routes { project, json } => {
            let config = RegistryConfig {
                mode: Mode::Production,
                ..load_config(&project)?
            };
            let snapshot = RegistryGenerator::new(config)?.run_once()?;
            println!("{}", routes_listing(&snapshot, json));
            Ok(())
        }
        Commands::Resolve {
            pattern,
            params,
            query,
        } => {
            println!("{}", resolve_command(&pattern, &params, &query)?);
            Ok(())
        }
        Commands::Match { pattern, path } => {
            println!("{}", match_command(&pattern, &path)?);
            Ok(())
        }
    }
}

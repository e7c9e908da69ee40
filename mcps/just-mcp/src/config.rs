//! Startup configuration: command line, environment and TOML files
//!
//! Config files are searched in order:
//! 1. `--config <path>` / `JUST_MCP_CONFIG_PATH`
//! 2. `./just-mcp.toml`
//! 3. `$XDG_CONFIG_HOME/just-mcp/config.toml`
//! 4. `~/.just-mcp.toml`
//! 5. Default config if none found
//!
//! Command line flags are applied on top of whichever file was loaded.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::types::{Config, JustError};

#[derive(Debug, Default, Parser)]
#[command(name = "just-mcp")]
#[command(about = "MCP server exposing justfile recipes as list/show/run tools")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (skips the standard search locations)
    #[arg(long, env = "JUST_MCP_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// just executable to invoke
    #[arg(long = "just", env = "JUST_MCP_EXECUTABLE")]
    pub executable: Option<String>,

    /// Default execution timeout in milliseconds
    #[arg(long, env = "JUST_MCP_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    /// Resolve the final configuration for this process
    pub fn into_config(self) -> Result<Config, JustError> {
        let mut config = match self.config.as_deref() {
            Some(path) => read_config(path)?,
            None => load_config(),
        };

        if let Some(executable) = self.executable {
            config.just.executable = executable;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeouts.default_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Read an explicitly requested config file; any failure is fatal
pub fn read_config(path: &Path) -> Result<Config, JustError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| JustError::Config(format!("{}: {}", path.display(), e)))?;
    let config = toml::from_str::<Config>(&content)
        .map_err(|e| JustError::Config(format!("{}: {}", path.display(), e)))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load config from standard file locations, falling back to defaults
pub fn load_config() -> Config {
    for path in search_paths() {
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Skipping config: {}", e),
        }
    }

    tracing::info!("Using default configuration");
    Config::default()
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("just-mcp.toml")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("just-mcp").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".just-mcp.toml"));
    }

    paths
}

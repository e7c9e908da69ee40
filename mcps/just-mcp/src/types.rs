//! Type definitions for just MCP

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Server configuration, loaded once at startup and never mutated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub just: JustConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Config {
    /// Reject values that would make every request fail
    pub fn validate(&self) -> Result<(), JustError> {
        if self.just.executable.trim().is_empty() {
            return Err(JustError::Config(
                "just.executable must not be empty".to_string(),
            ));
        }
        if self.timeouts.default_ms == 0 {
            return Err(JustError::Config(
                "timeouts.default_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.default_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JustConfig {
    /// Program invoked for every operation
    #[serde(default = "default_executable")]
    pub executable: String,
}

fn default_executable() -> String {
    "just".to_string()
}

impl Default for JustConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Timeout applied when a request carries no numeric `timeout`
    #[serde(default = "default_timeout_ms")]
    pub default_ms: u64,
}

/// Five minutes
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_ms: default_timeout_ms(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Reasons a recipe identifier is refused before anything is spawned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeNameError {
    #[error("recipe is required and must be a string")]
    Missing,

    #[error("recipe must not be empty")]
    Empty,

    #[error("recipe must not start with '-': {0}")]
    LeadingDash(String),

    #[error("invalid recipe name '{0}': only letters, digits, '_' and '-' are allowed")]
    DisallowedCharacters(String),
}

#[derive(Error, Debug)]
pub enum JustError {
    #[error(transparent)]
    InvalidArgument(#[from] RecipeNameError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Config error: {0}")]
    Config(String),
}

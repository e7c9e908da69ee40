//! just MCP Library
//!
//! Exposes justfile recipes to MCP clients through three tools:
//!
//! - `list`: `just --color=never [--justfile F] --list`
//! - `show`: `just --color=never [--justfile F] --show <recipe>`
//! - `run`: `just --color=never [--justfile F] <recipe> [args...]`
//!
//! Recipe names are restricted to `[A-Za-z0-9_-]+` and must not start with
//! `-`. Every run is bounded by a timeout (default five minutes); a process
//! still running when it expires is sent SIGTERM and reported with exit
//! code 124.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use just_mcp::{Config, JustMcpServer};
//!
//! let server = JustMcpServer::with_config(Config::default())?;
//! let result = server.call("list", serde_json::json!({ "working_directory": "/repo" })).await;
//! ```

pub mod config;
pub mod executor;
pub mod handlers;
pub mod init;
pub mod params;
pub mod registry;
pub mod request;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::JustMcpServer;

pub use config::Cli;
pub use executor::{execute, ExecutionOutcome};
pub use handlers::{format_outcome, Dispatcher};
pub use init::init_tracing;
pub use params::*;
pub use registry::{Operation, OperationSpec, OPERATIONS};
pub use request::{translate, ArgumentBag, ExecutionRequest, RecipeName};
pub use types::{Config, JustError, RecipeNameError};

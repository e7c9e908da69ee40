//! Parameter types for just MCP tools
//!
//! These structs describe the argument shapes advertised to clients.
//! Incoming arguments are decoded leniently by [`crate::request`], not
//! through these types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListParams {
    #[schemars(description = "Path to the justfile (optional, just searches upward from the working directory)")]
    #[serde(default)]
    pub justfile: Option<String>,

    #[schemars(description = "Directory to run just in (optional, defaults to the server's working directory)")]
    #[serde(default)]
    pub working_directory: Option<String>,

    #[schemars(description = "Timeout in milliseconds (optional, defaults to 300000)")]
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ShowParams {
    #[schemars(description = "Name of the recipe to show (letters, digits, '_' and '-')")]
    pub recipe: String,

    #[schemars(description = "Path to the justfile (optional, just searches upward from the working directory)")]
    #[serde(default)]
    pub justfile: Option<String>,

    #[schemars(description = "Directory to run just in (optional, defaults to the server's working directory)")]
    #[serde(default)]
    pub working_directory: Option<String>,

    #[schemars(description = "Timeout in milliseconds (optional, defaults to 300000)")]
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RunParams {
    #[schemars(description = "Name of the recipe to run (letters, digits, '_' and '-')")]
    pub recipe: String,

    #[schemars(description = "Arguments passed to the recipe, one token each (optional)")]
    #[serde(default)]
    pub args: Option<Vec<String>>,

    #[schemars(description = "Path to the justfile (optional, just searches upward from the working directory)")]
    #[serde(default)]
    pub justfile: Option<String>,

    #[schemars(description = "Directory to run just in (optional, defaults to the server's working directory)")]
    #[serde(default)]
    pub working_directory: Option<String>,

    #[schemars(description = "Timeout in milliseconds (optional, defaults to 300000)")]
    #[serde(default)]
    pub timeout: Option<u64>,
}

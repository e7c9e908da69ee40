//! Argument decoding and translation into a just invocation
//!
//! Client arguments arrive as an untyped JSON object. They are decoded
//! leniently (wrong-typed optional fields are ignored) and the recipe name is
//! validated before any token reaches the argument vector. Arguments are never
//! joined into a shell string, so the recipe character class is the only
//! injection defense needed.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::registry::Operation;
use crate::types::RecipeNameError;

/// Raw key/value arguments as received from the caller
pub type ArgumentBag = Map<String, Value>;

/// Flag passed on every invocation so captured output is free of ANSI codes
pub const NO_COLOR_FLAG: &str = "--color=never";

static RECIPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid regex"));

/// A recipe identifier that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeName(String);

impl RecipeName {
    pub fn parse(raw: Option<&str>) -> Result<Self, RecipeNameError> {
        let name = raw.ok_or(RecipeNameError::Missing)?;

        if name.trim().is_empty() {
            return Err(RecipeNameError::Empty);
        }
        if name.starts_with('-') {
            return Err(RecipeNameError::LeadingDash(name.to_string()));
        }
        if !RECIPE_PATTERN.is_match(name) {
            return Err(RecipeNameError::DisallowedCharacters(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fully validated invocation, ready for the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub args: Vec<String>,
    pub working_directory: Option<PathBuf>,
    pub timeout: Duration,
}

/// Typed view of an [`ArgumentBag`]
#[derive(Debug, Default, Deserialize)]
struct ToolArguments {
    #[serde(default, deserialize_with = "lenient_string")]
    recipe: Option<String>,

    #[serde(default, deserialize_with = "lenient_string_list")]
    args: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_path")]
    justfile: Option<String>,

    #[serde(default, deserialize_with = "lenient_path")]
    working_directory: Option<String>,

    #[serde(default, deserialize_with = "lenient_millis")]
    timeout: Option<u64>,
}

impl ToolArguments {
    fn from_bag(bag: ArgumentBag) -> Self {
        // Every field accepts any JSON value, so decoding an object cannot fail
        ToolArguments::deserialize(Value::Object(bag)).unwrap_or_default()
    }
}

/// Validate a request and build the argument vector for `operation`
pub fn translate(
    operation: Operation,
    bag: ArgumentBag,
    default_timeout: Duration,
) -> Result<ExecutionRequest, RecipeNameError> {
    let arguments = ToolArguments::from_bag(bag);

    let mut args = vec![NO_COLOR_FLAG.to_string()];
    if let Some(justfile) = &arguments.justfile {
        args.push("--justfile".to_string());
        args.push(justfile.clone());
    }

    match operation {
        Operation::List => {
            args.push("--list".to_string());
        }
        Operation::Show => {
            let recipe = RecipeName::parse(arguments.recipe.as_deref())?;
            args.push("--show".to_string());
            args.push(recipe.as_str().to_string());
        }
        Operation::Run => {
            let recipe = RecipeName::parse(arguments.recipe.as_deref())?;
            args.push(recipe.as_str().to_string());
            args.extend(arguments.args.unwrap_or_default());
        }
    }

    Ok(ExecutionRequest {
        args,
        working_directory: arguments.working_directory.map(PathBuf::from),
        timeout: arguments
            .timeout
            .map(Duration::from_millis)
            .unwrap_or(default_timeout),
    })
}

// ============================================================================
// Lenient field decoding
// ============================================================================

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Like [`lenient_string`], but an empty string counts as absent
fn lenient_path<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.filter(|s| !s.is_empty()))
}

/// Keeps only the string elements of an array; anything else is ignored
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Any JSON number, truncated to whole milliseconds and clamped at zero
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|ms| ms.max(0.0) as u64)),
        _ => None,
    })
}

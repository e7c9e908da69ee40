//! Request dispatch and response formatting
//!
//! The dispatcher owns the only path from a tool call to a subprocess:
//! registry lookup, translation, execution, formatting. It never fails; every
//! error is rendered as an `isError` tool result.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};

use crate::executor::{self, ExecutionOutcome};
use crate::registry::{self, OperationSpec};
use crate::request::{self, ArgumentBag};
use crate::types::{Config, JustError};

/// Success text used when a process exits cleanly without printing anything
pub const NO_OUTPUT_MESSAGE: &str = "Command completed successfully (no output)";

// ============================================================================
// Helper Functions
// ============================================================================

/// Render an outcome as the single text blob returned to the caller
///
/// stdout comes first, then stderr on the next line, then an exit code
/// marker if the process did not exit cleanly.
pub fn format_outcome(outcome: &ExecutionOutcome) -> String {
    let mut text = outcome.stdout.clone();

    if !outcome.stderr.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&outcome.stderr);
    }

    if outcome.exit_code != 0 {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&format!("[Exit code: {}]", outcome.exit_code));
    }

    if text.is_empty() {
        return NO_OUTPUT_MESSAGE.to_string();
    }
    text
}

pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

pub fn error_result(err: &JustError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", err))])
}

// ============================================================================
// Dispatcher
// ============================================================================

#[derive(Debug, Clone)]
pub struct Dispatcher {
    operations: &'static [OperationSpec],
    config: Arc<Config>,
}

impl Dispatcher {
    pub fn new(operations: &'static [OperationSpec], config: Config) -> Self {
        Self {
            operations,
            config: Arc::new(config),
        }
    }

    pub fn operations(&self) -> &'static [OperationSpec] {
        self.operations
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle one tool call end to end
    pub async fn dispatch(&self, name: &str, arguments: ArgumentBag) -> CallToolResult {
        match self.invoke(name, arguments).await {
            Ok(text) => text_success(text),
            Err(e) => {
                tracing::warn!(tool = name, "rejected tool call: {}", e);
                error_result(&e)
            }
        }
    }

    async fn invoke(&self, name: &str, arguments: ArgumentBag) -> Result<String, JustError> {
        let spec = registry::lookup(self.operations, name)
            .ok_or_else(|| JustError::UnknownTool(name.to_string()))?;

        let request =
            request::translate(spec.operation, arguments, self.config.default_timeout())?;

        let outcome = executor::execute(&self.config.just.executable, &request).await;
        Ok(format_outcome(&outcome))
    }
}

//! Static catalog of the tools this server advertises
//!
//! The table is built at compile time and handed to the dispatcher; it only
//! describes operations, it never validates arguments.

use std::sync::Arc;

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde_json::{Map, Value};

use crate::params::{ListParams, RunParams, ShowParams};

/// The operations a client may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Show,
    Run,
}

impl Operation {
    /// Wire name used in `tools/list` and `tools/call`
    pub fn name(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Show => "show",
            Operation::Run => "run",
        }
    }
}

/// One registry entry: an operation plus its advertised argument schema
#[derive(Debug)]
pub struct OperationSpec {
    pub operation: Operation,
    pub description: &'static str,
    schema: fn() -> Map<String, Value>,
}

impl OperationSpec {
    pub fn name(&self) -> &'static str {
        self.operation.name()
    }

    pub fn input_schema(&self) -> Map<String, Value> {
        (self.schema)()
    }

    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name(), self.description, Arc::new(self.input_schema()))
    }
}

pub static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        operation: Operation::List,
        description: "List the recipes available in the justfile",
        schema: schema_object::<ListParams>,
    },
    OperationSpec {
        operation: Operation::Show,
        description: "Show the source of a single recipe",
        schema: schema_object::<ShowParams>,
    },
    OperationSpec {
        operation: Operation::Run,
        description: "Run a recipe with optional arguments and return its combined output",
        schema: schema_object::<RunParams>,
    },
];

/// Find the entry for a wire name
pub fn lookup(operations: &'static [OperationSpec], name: &str) -> Option<&'static OperationSpec> {
    operations.iter().find(|spec| spec.name() == name)
}

pub fn tools(operations: &[OperationSpec]) -> Vec<Tool> {
    operations.iter().map(OperationSpec::to_tool).collect()
}

fn schema_object<T: JsonSchema>() -> Map<String, Value> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

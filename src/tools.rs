//! Tool surface exposed to agents.
//!
//! Each tool maps onto one registry operation. Agents address tools by name
//! with JSON arguments; results are always strings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::registry::TodoRegistry;
use crate::task::TaskRef;

pub const ADD_TODO: &str = "add_todo";
pub const REMOVE_TASK: &str = "remove_task";
pub const COMPLETE_TASK: &str = "complete_task";
pub const LIST_TODOS: &str = "list_todos";
pub const FORMAT_LIST: &str = "format_list";

/// Every tool name, in the order they are advertised.
pub const TOOL_NAMES: [&str; 5] = [ADD_TODO, REMOVE_TASK, COMPLETE_TASK, LIST_TODOS, FORMAT_LIST];

/// A parsed tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    AddTodo { item: String },
    RemoveTask { target: TaskRef },
    CompleteTask { target: TaskRef },
    ListTodos,
    FormatList,
}

#[derive(Deserialize)]
struct AddArgs {
    item: String,
}

#[derive(Deserialize)]
struct TargetArgs {
    #[serde(rename = "idOrTitle")]
    id_or_title: TaskRef,
}

impl ToolCall {
    /// Parse a call from a tool name and its JSON arguments.
    pub fn parse(name: &str, args: Value) -> Result<Self> {
        let call = match name {
            ADD_TODO => {
                let args: AddArgs = parse_args(name, args)?;
                ToolCall::AddTodo { item: args.item }
            }
            REMOVE_TASK => {
                let args: TargetArgs = parse_args(name, args)?;
                ToolCall::RemoveTask {
                    target: args.id_or_title,
                }
            }
            COMPLETE_TASK => {
                let args: TargetArgs = parse_args(name, args)?;
                ToolCall::CompleteTask {
                    target: args.id_or_title,
                }
            }
            LIST_TODOS => ToolCall::ListTodos,
            FORMAT_LIST => ToolCall::FormatList,
            other => return Err(Error::UnknownTool(other.to_string())),
        };
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::AddTodo { .. } => ADD_TODO,
            ToolCall::RemoveTask { .. } => REMOVE_TASK,
            ToolCall::CompleteTask { .. } => COMPLETE_TASK,
            ToolCall::ListTodos => LIST_TODOS,
            ToolCall::FormatList => FORMAT_LIST,
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(name: &str, args: Value) -> Result<T> {
    // Tools without parameters may be called with `null`.
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|err| Error::InvalidArgument(format!("{name}: {err}")))
}

/// Result of one tool call
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool: String,
    pub output: String,
}

/// Runs tool calls against a todo registry.
#[derive(Debug)]
pub struct ToolBox {
    registry: TodoRegistry,
}

impl ToolBox {
    pub fn new(registry: TodoRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TodoRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TodoRegistry {
        &mut self.registry
    }

    /// Parse and run a call by name.
    pub fn dispatch(&mut self, name: &str, args: Value) -> Result<ToolOutput> {
        let call = ToolCall::parse(name, args)?;
        self.call(&call)
    }

    /// Run a parsed call.
    pub fn call(&mut self, call: &ToolCall) -> Result<ToolOutput> {
        tracing::debug!(tool = call.name(), ?call, "dispatching tool");
        let output = match call {
            ToolCall::AddTodo { item } => self.registry.add(item)?,
            ToolCall::RemoveTask { target } | ToolCall::CompleteTask { target } => {
                self.registry.complete(target)?
            }
            ToolCall::ListTodos => serde_json::to_string_pretty(&self.registry.list())?,
            ToolCall::FormatList => self.registry.format(),
        };
        Ok(ToolOutput {
            tool: call.name().to_string(),
            output,
        })
    }
}

/// Description of a tool, as advertised to an agent runtime
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Specs for every tool.
pub fn tool_specs() -> Vec<ToolSpec> {
    let target = json!({
        "type": "object",
        "properties": {
            "idOrTitle": {
                "anyOf": [{ "type": "number" }, { "type": "string" }],
                "description": "Task id or (partial) title"
            }
        },
        "required": ["idOrTitle"],
        "additionalProperties": false
    });
    let empty = json!({ "type": "object", "properties": {}, "additionalProperties": false });

    vec![
        ToolSpec {
            name: ADD_TODO,
            description: "Add an item to the todo list. Use when the user says \"add X\", \
                \"create X\", \"new task X\". Call once per item: \"add rice cereal milk\" \
                is three calls.",
            parameters: json!({
                "type": "object",
                "properties": { "item": { "type": "string" } },
                "required": ["item"],
                "additionalProperties": false
            }),
        },
        ToolSpec {
            name: REMOVE_TASK,
            description: "Remove or clear a task from the list. Marks it complete (does not \
                delete). Use for \"remove X\", \"clear X\", \"delete X\", \"get rid of X\". \
                Call once per item. Accepts a task id or title; \"haircut\" matches \
                \"haircut at 10am\".",
            parameters: target.clone(),
        },
        ToolSpec {
            name: COMPLETE_TASK,
            description: "Mark a task as done. Use for \"complete X\", \"finish X\", \"done \
                with X\", \"mark X done\". Call once per item. Accepts a task id or title; \
                \"haircut\" matches \"haircut at 10am\".",
            parameters: target,
        },
        ToolSpec {
            name: LIST_TODOS,
            description: "Get all tasks as a raw JSON array. Use when the user wants raw data.",
            parameters: empty.clone(),
        },
        ToolSpec {
            name: FORMAT_LIST,
            description: "Get a formatted display of all tasks, one per line: \"⬜ Task\" (open) \
                or \"✅ Task\" (done). Use for \"list\", \"show my tasks\", \"what's on my list\".",
            parameters: empty,
        },
    ]
}

/// Short activity description for trace output.
pub fn tool_summary(name: &str) -> &str {
    match name {
        ADD_TODO => "adding item",
        REMOVE_TASK => "removing task",
        COMPLETE_TASK => "completing task",
        LIST_TODOS => "listing tasks",
        FORMAT_LIST => "formatting list",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateStore;
    use crate::task::{AppState, TaskSummary};
    use tempfile::TempDir;

    fn toolbox(temp: &TempDir) -> ToolBox {
        let store = StateStore::open(temp.path().join("state.json"), AppState::default());
        ToolBox::new(TodoRegistry::new(store))
    }

    #[test]
    fn parse_accepts_number_or_string_targets() {
        let by_id = ToolCall::parse(COMPLETE_TASK, json!({ "idOrTitle": 2 })).unwrap();
        assert_eq!(
            by_id,
            ToolCall::CompleteTask {
                target: TaskRef::ById(2)
            }
        );
        let by_title = ToolCall::parse(REMOVE_TASK, json!({ "idOrTitle": "milk" })).unwrap();
        assert_eq!(
            by_title,
            ToolCall::RemoveTask {
                target: TaskRef::ByTitle("milk".into())
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_tools_and_bad_args() {
        let err = ToolCall::parse("delete_everything", Value::Null).unwrap_err();
        assert!(matches!(err, Error::UnknownTool(_)));

        let err = ToolCall::parse(ADD_TODO, json!({ "title": "x" })).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        assert_eq!(
            ToolCall::parse(LIST_TODOS, Value::Null).unwrap(),
            ToolCall::ListTodos
        );
    }

    #[test]
    fn list_todos_returns_json() {
        let temp = TempDir::new().unwrap();
        let mut tools = toolbox(&temp);
        tools.dispatch(ADD_TODO, json!({ "item": "Buy Milk" })).unwrap();

        let out = tools.dispatch(LIST_TODOS, json!({})).unwrap();

        assert_eq!(out.tool, LIST_TODOS);
        let parsed: Vec<TaskSummary> = serde_json::from_str(&out.output).unwrap();
        assert_eq!(parsed, tools.registry().list());
    }

    #[test]
    fn remove_marks_complete_without_deleting() {
        let temp = TempDir::new().unwrap();
        let mut tools = toolbox(&temp);
        tools.dispatch(ADD_TODO, json!({ "item": "rice" })).unwrap();

        let out = tools.dispatch(REMOVE_TASK, json!({ "idOrTitle": "rice" })).unwrap();

        assert!(out.output.starts_with("Completed: rice"));
        assert_eq!(tools.registry().tasks().len(), 1);
        assert!(tools.registry().tasks()[0].completed);
    }

    #[test]
    fn any_number_is_an_id_lookup() {
        let temp = TempDir::new().unwrap();
        let mut tools = toolbox(&temp);
        tools.dispatch(ADD_TODO, json!({ "item": "rice" })).unwrap();
        tools.dispatch(ADD_TODO, json!({ "item": "milk" })).unwrap();

        for missing in [json!(-1), json!(1.5), json!(0)] {
            let out = tools
                .dispatch(COMPLETE_TASK, json!({ "idOrTitle": missing }))
                .unwrap();
            assert_eq!(out.output, "Error: Task not found.");
        }
        assert!(tools.registry().tasks().iter().all(|task| !task.completed));

        let out = tools
            .dispatch(REMOVE_TASK, json!({ "idOrTitle": 2.0 }))
            .unwrap();
        assert!(out.output.starts_with("Completed: milk"));
    }

    #[test]
    fn specs_cover_every_tool() {
        let names: Vec<&str> = tool_specs().iter().map(|spec| spec.name).collect();
        assert_eq!(names, TOOL_NAMES.to_vec());
    }
}

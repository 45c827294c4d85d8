//! Agent runtime interface and the built-in keyword agent.
//!
//! An [`Agent`] turns one user message into zero or more tool calls. The
//! reply of a turn is the output of the last tool it ran, so every call in a
//! multi-item request has finished before anything is shown.
//!
//! [`KeywordAgent`] routes plain English requests without a language model:
//!
//! ```text
//! add rice, cereal and milk   -> add_todo x3
//! remove milk                 -> remove_task
//! mark haircut done           -> complete_task
//! show my list                -> format_list
//! list as json                -> list_todos
//! ```

use anyhow::Context;
use serde_json::json;

use crate::task::TaskRef;
use crate::tools::{
    ToolBox, ToolOutput, ADD_TODO, COMPLETE_TASK, FORMAT_LIST, LIST_TODOS, REMOVE_TASK,
};
use crate::trace::{TraceEvent, TraceSink};

/// What an agent produced for one user turn
#[derive(Debug, Clone, Default)]
pub struct AgentReply {
    pub final_output: String,
    pub tool_outputs: Vec<ToolOutput>,
}

impl AgentReply {
    fn from_tools(tool_outputs: Vec<ToolOutput>) -> Option<Self> {
        let last = tool_outputs.last()?.output.clone();
        Some(Self {
            final_output: last,
            tool_outputs,
        })
    }
}

/// Anything that can handle a user turn using the todo tools.
pub trait Agent {
    fn name(&self) -> &str;

    /// Handle one user message. Calls are issued one after another.
    fn run(
        &mut self,
        input: &str,
        tools: &mut ToolBox,
        trace: &mut dyn TraceSink,
    ) -> anyhow::Result<AgentReply>;
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(Vec<String>),
    Remove(Vec<TaskRef>),
    Complete(Vec<TaskRef>),
    RawList,
    ShowList,
    Unknown,
}

const POLITE_PREFIXES: [&str; 6] = [
    "please ",
    "can you ",
    "could you ",
    "would you ",
    "i need to ",
    "i want to ",
];

const COMPLETE_PREFIXES: [&str; 7] = [
    "complete ",
    "finish ",
    "done with ",
    "check off ",
    "tick off ",
    "i finished ",
    "i did ",
];

const MARK_SUFFIXES: [&str; 6] = [
    " as done",
    " as complete",
    " as completed",
    " done",
    " complete",
    " completed",
];

const REMOVE_PREFIXES: [&str; 5] = ["remove ", "clear ", "delete ", "get rid of ", "drop "];

const ADD_PREFIXES: [&str; 6] = [
    "add ",
    "create ",
    "new task ",
    "new todo ",
    "put ",
    "remember to ",
];

const LIST_SUFFIXES: [&str; 6] = [
    " to my list",
    " to the list",
    " to list",
    " from my list",
    " from the list",
    " from list",
];

const SHOW_WORDS: [&str; 7] = [
    "list", "show", "display", "tasks", "todos", "what's on", "what is on",
];

pub const HELP_REPLY: &str = "I can add, complete, remove, and list tasks. Try \"add buy milk\", \
\"complete buy milk\", \"remove 2\", or \"show my list\".";

/// Rule-based agent that needs no model.
#[derive(Debug, Clone)]
pub struct KeywordAgent {
    name: String,
}

impl KeywordAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for KeywordAgent {
    fn default() -> Self {
        Self::new("Todo List Assistant")
    }
}

impl Agent for KeywordAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(
        &mut self,
        input: &str,
        tools: &mut ToolBox,
        trace: &mut dyn TraceSink,
    ) -> anyhow::Result<AgentReply> {
        trace.on_event(&TraceEvent::Started);

        let intent = parse_intent(input);
        tracing::debug!(?intent, "parsed intent");

        let calls: Vec<(&str, serde_json::Value)> = match &intent {
            Intent::Add(items) => items
                .iter()
                .map(|item| (ADD_TODO, json!({ "item": item })))
                .collect(),
            Intent::Remove(targets) => targets
                .iter()
                .map(|target| (REMOVE_TASK, json!({ "idOrTitle": target })))
                .collect(),
            Intent::Complete(targets) => targets
                .iter()
                .map(|target| (COMPLETE_TASK, json!({ "idOrTitle": target })))
                .collect(),
            Intent::RawList => vec![(LIST_TODOS, json!({}))],
            Intent::ShowList => vec![(FORMAT_LIST, json!({}))],
            Intent::Unknown => Vec::new(),
        };

        let mut outputs = Vec::with_capacity(calls.len());
        for (name, args) in calls {
            let output = tools
                .dispatch(name, args)
                .with_context(|| format!("tool {name} failed"))?;
            trace.on_event(&TraceEvent::Tool(name.to_string()));
            outputs.push(output);
        }

        trace.on_event(&TraceEvent::Agent(self.name.clone()));

        Ok(AgentReply::from_tools(outputs).unwrap_or_else(|| AgentReply {
            final_output: HELP_REPLY.to_string(),
            tool_outputs: Vec::new(),
        }))
    }
}

/// Work out what a message asks for.
pub fn parse_intent(input: &str) -> Intent {
    let text = strip_polite(input.trim().trim_end_matches(['.', '!', '?']).trim());
    let lower = text.to_ascii_lowercase();

    if let Some(rest) = strip_prefix_any(text, &lower, &COMPLETE_PREFIXES) {
        return targets(rest, Intent::Complete);
    }
    if let Some(rest) = lower.starts_with("mark ").then(|| &text[5..]) {
        let rest_lower = rest.to_ascii_lowercase();
        if let Some(suffix) = MARK_SUFFIXES.iter().find(|s| rest_lower.ends_with(*s)) {
            return targets(&rest[..rest.len() - suffix.len()], Intent::Complete);
        }
    }
    if let Some(rest) = strip_prefix_any(text, &lower, &REMOVE_PREFIXES) {
        return targets(strip_list_suffix(rest), Intent::Remove);
    }
    if let Some(rest) = strip_prefix_any(text, &lower, &ADD_PREFIXES) {
        let items = split_items(strip_list_suffix(rest));
        return if items.is_empty() {
            Intent::Unknown
        } else {
            Intent::Add(items)
        };
    }
    if lower.contains("json") || lower.contains("raw") {
        return Intent::RawList;
    }
    if SHOW_WORDS.iter().any(|word| lower.contains(word)) {
        return Intent::ShowList;
    }
    Intent::Unknown
}

fn targets(rest: &str, wrap: fn(Vec<TaskRef>) -> Intent) -> Intent {
    let refs: Vec<TaskRef> = split_items(rest)
        .iter()
        .filter_map(|item| item.parse().ok())
        .collect();
    if refs.is_empty() {
        Intent::Unknown
    } else {
        wrap(refs)
    }
}

fn strip_polite(mut text: &str) -> &str {
    loop {
        let lower = text.to_ascii_lowercase();
        match strip_prefix_any(text, &lower, &POLITE_PREFIXES) {
            Some(rest) => text = rest,
            None => return text,
        }
    }
}

/// `lower` must be the ASCII-lowercased `text`, so byte offsets line up.
fn strip_prefix_any<'a>(text: &'a str, lower: &str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map(|prefix| text[prefix.len()..].trim())
}

fn strip_list_suffix(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();
    LIST_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map(|suffix| text[..text.len() - suffix.len()].trim())
        .unwrap_or(text)
}

/// Split "a, b and c" into items. Surrounding quotes are dropped.
pub fn split_items(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    for part in text.split([',', ';', '&']) {
        let mut rest = part;
        loop {
            let lower = rest.to_ascii_lowercase();
            match lower.find(" and ") {
                Some(pos) => {
                    push_item(&mut items, &rest[..pos]);
                    rest = &rest[pos + 5..];
                }
                None => {
                    push_item(&mut items, rest);
                    break;
                }
            }
        }
    }
    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let mut item = raw.trim();
    if let Some(stripped) = item.strip_prefix("and ") {
        item = stripped.trim();
    }
    let item = item.trim_matches(|c| c == '"' || c == '\'').trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
}

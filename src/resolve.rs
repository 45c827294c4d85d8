//! Task reference resolution.
//!
//! Ids match exactly. Titles match case-insensitively: an exact title wins
//! outright, otherwise a unique substring match is accepted. Several
//! substring matches are ambiguous and never auto-resolved.

use crate::task::{Task, TaskRef};

/// Outcome of resolving a [`TaskRef`] against a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Index of the matched task in the input slice.
    Found(usize),
    NotFound,
    /// Titles of every candidate, in stored order.
    Ambiguous(Vec<String>),
}

impl Resolution {
    /// User-facing message for outcomes that do not resolve to a task.
    pub fn message(&self) -> Option<String> {
        match self {
            Resolution::Found(_) => None,
            Resolution::NotFound => Some(NOT_FOUND_MESSAGE.to_string()),
            Resolution::Ambiguous(titles) => Some(format!(
                "Error: Multiple matches ({}). Be more specific.",
                titles.join(", ")
            )),
        }
    }
}

pub const NOT_FOUND_MESSAGE: &str = "Error: Task not found.";

/// Resolve a task reference. Pure: no mutation, no I/O.
pub fn resolve(tasks: &[Task], target: &TaskRef) -> Resolution {
    match target {
        TaskRef::ByTitle(title) => resolve_title(tasks, title),
        id => tasks
            .iter()
            .position(|task| id.matches_id(task))
            .map(Resolution::Found)
            .unwrap_or(Resolution::NotFound),
    }
}

fn resolve_title(tasks: &[Task], input: &str) -> Resolution {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Resolution::NotFound;
    }

    if let Some(index) = tasks
        .iter()
        .position(|task| task.title.to_lowercase() == needle)
    {
        return Resolution::Found(index);
    }

    let matches: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.title.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [] => Resolution::NotFound,
        [index] => Resolution::Found(*index),
        _ => Resolution::Ambiguous(
            matches
                .iter()
                .map(|&index| tasks[index].title.clone())
                .collect(),
        ),
    }
}

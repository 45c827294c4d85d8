//! Todo operations: add, complete, list, format.
//!
//! Every operation reads the latest todos from the [`StateStore`] and the two
//! mutators write the full list back. Nothing is cached between calls, so a
//! run of sequential calls always sees the effects of the previous ones.

use crate::error::Result;
use crate::resolve::{resolve, Resolution};
use crate::state::StateStore;
use crate::task::{AppState, Task, TaskRef, TaskSummary};

pub const LIST_HEADER: &str = "Here are your tasks:";
pub const EMPTY_LIST: &str = "(no tasks)";
pub const OPEN_GLYPH: &str = "⬜";
pub const COMPLETE_GLYPH: &str = "✅";
pub const EMPTY_TITLE_MESSAGE: &str = "Error: Task title cannot be empty.";

/// Todo registry backed by a state store
#[derive(Debug)]
pub struct TodoRegistry {
    store: StateStore<AppState>,
}

impl TodoRegistry {
    pub fn new(store: StateStore<AppState>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StateStore<AppState> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore<AppState> {
        &mut self.store
    }

    /// Current todos, in stored order.
    pub fn tasks(&self) -> &[Task] {
        &self.store.get().todos
    }

    /// Add a task, or reactivate a completed one with the same title.
    pub fn add(&mut self, item: &str) -> Result<String> {
        let title = item.trim();
        if title.is_empty() {
            return Ok(EMPTY_TITLE_MESSAGE.to_string());
        }

        let mut todos = self.tasks().to_vec();

        if todos
            .iter()
            .any(|task| !task.completed && task.title_matches(title))
        {
            tracing::debug!(title, "add rejected: open duplicate");
            return Ok(format!(
                "warning: ⚠️  Item already \"{title}\" exists.\n\n{}",
                self.format()
            ));
        }

        // Re-adding a completed task reopens it instead of creating a second row.
        if let Some(index) = todos
            .iter()
            .position(|task| task.completed && task.title_matches(title))
        {
            todos[index].completed = false;
            tracing::debug!(id = todos[index].id, title, "reactivated completed task");
            self.store.update(|state| state.todos = todos)?;
            return Ok(format!(
                "warning: ⚠️  The completed item \"{title}\" already exists. I went ahead and activated it again!\n\n{}",
                self.format()
            ));
        }

        let id = self.store.get().next_id();
        todos.push(Task::new(id, title));
        tracing::debug!(id, title, "added task");
        self.store.update(|state| state.todos = todos)?;

        Ok(format!("Added: {title}\n\n{}", self.format()))
    }

    /// Mark a task complete. Also serves "remove": tasks are never deleted.
    pub fn complete(&mut self, target: &TaskRef) -> Result<String> {
        let mut todos = self.tasks().to_vec();

        let index = match resolve(&todos, target) {
            Resolution::Found(index) => index,
            unresolved => {
                tracing::debug!(task_ref = %target, ?unresolved, "complete did not resolve");
                return Ok(unresolved.message().unwrap_or_default());
            }
        };

        todos[index].completed = true;
        let title = todos[index].title.clone();
        tracing::debug!(id = todos[index].id, title = %title, "completed task");
        self.store.update(|state| state.todos = todos)?;

        Ok(format!("Completed: {title}\n\n{}", self.format()))
    }

    /// Title and status for every task, in stored order.
    pub fn list(&self) -> Vec<TaskSummary> {
        self.tasks().iter().map(TaskSummary::from).collect()
    }

    /// Human-readable listing with completed tasks last.
    pub fn format(&self) -> String {
        format_tasks(self.tasks())
    }
}

/// Render a task list. Stable: relative order within open and completed
/// tasks is kept.
pub fn format_tasks(tasks: &[Task]) -> String {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|task| task.completed);

    let body = if ordered.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        ordered
            .iter()
            .map(|task| {
                let glyph = if task.completed {
                    COMPLETE_GLYPH
                } else {
                    OPEN_GLYPH
                };
                format!("{glyph} {}", task.title)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("{LIST_HEADER}\n\n{body}")
}

//! Derived, never-persisted view state for lists and todos: completion,
//! counts, display order and name validation.
//!
//! Everything here is pure. The storage layer fetches rows, these functions
//! turn them into what a page shows.

use crate::entities::{ListSummary, Todo, TodoList};
use crate::errors::DomainError;
use serde::Serialize;

pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 100;

pub const NAME_LENGTH_ERROR: &str = "Name must be between 1 and 100 characters.";
pub const NAME_TAKEN_ERROR: &str = "Name already exists.";

/// Total and not-yet-completed todos of one list.
///
/// Construction enforces `remaining <= count`, so derivations never see
/// inconsistent aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TodoCounts {
    pub todos_count: u32,
    pub todos_remaining: u32,
}

impl TodoCounts {
    pub fn new(todos_count: u32, todos_remaining: u32) -> Result<Self, DomainError> {
        if todos_remaining > todos_count {
            return Err(DomainError::InvalidCounts {
                count: i64::from(todos_count),
                remaining: i64::from(todos_remaining),
            });
        }
        Ok(Self {
            todos_count,
            todos_remaining,
        })
    }

    /// Accepts the signed aggregates SQL hands back.
    pub fn try_from_raw(todos_count: i64, todos_remaining: i64) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidCounts {
            count: todos_count,
            remaining: todos_remaining,
        };
        let count = u32::try_from(todos_count).map_err(|_| invalid())?;
        let remaining = u32::try_from(todos_remaining).map_err(|_| invalid())?;
        Self::new(count, remaining).map_err(|_| invalid())
    }

    pub fn from_todos(todos: &[Todo]) -> Self {
        let count = saturating_u32(todos.len());
        let remaining = saturating_u32(todos.iter().filter(|todo| !todo.completed).count());
        Self {
            todos_count: count,
            todos_remaining: remaining,
        }
    }
}

/// Clamps rather than wraps, so `remaining <= count` survives huge lists.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A list is completed once it has todos and none of them is open.
/// An empty list is never completed.
pub fn list_completed(counts: TodoCounts) -> bool {
    counts.todos_count > 0 && counts.todos_remaining == 0
}

/// Same answer as [`list_completed`] when the todos themselves are at hand.
pub fn list_completed_from_todos(todos: &[Todo]) -> bool {
    !todos.is_empty() && todos.iter().all(|todo| todo.completed)
}

/// Stable partition into `[incomplete..., complete...]`.
///
/// Each group keeps its original relative order, so re-partitioning an
/// already partitioned sequence returns it unchanged.
pub fn partition_for_display<T, F>(items: Vec<T>, is_complete: F) -> Vec<T>
where
    F: Fn(&T) -> bool,
{
    let (complete, mut incomplete): (Vec<T>, Vec<T>) =
        items.into_iter().partition(|item| is_complete(item));
    incomplete.extend(complete);
    incomplete
}

fn name_length_ok(name: &str) -> bool {
    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name.chars().count())
}

/// `existing_names` must only hold names of the same user's other lists.
pub fn validate_list_name<S: AsRef<str>>(name: &str, existing_names: &[S]) -> Option<String> {
    if !name_length_ok(name) {
        Some(NAME_LENGTH_ERROR.to_string())
    } else if existing_names.iter().any(|existing| existing.as_ref() == name) {
        Some(NAME_TAKEN_ERROR.to_string())
    } else {
        None
    }
}

pub fn validate_todo_name(name: &str) -> Option<String> {
    if name_length_ok(name) {
        None
    } else {
        Some(NAME_LENGTH_ERROR.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOverview {
    pub id: i32,
    pub name: String,
    pub todos_count: u32,
    pub todos_remaining: u32,
    pub completed: bool,
}

impl ListOverview {
    pub fn from_summary(summary: ListSummary) -> Result<Self, DomainError> {
        let counts = TodoCounts::try_from_raw(summary.todos_count, summary.todos_remaining)?;
        Ok(Self {
            id: summary.id,
            name: summary.name,
            todos_count: counts.todos_count,
            todos_remaining: counts.todos_remaining,
            completed: list_completed(counts),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoView {
    pub id: i32,
    pub name: String,
    pub completed: bool,
}

impl From<Todo> for TodoView {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            name: todo.name,
            completed: todo.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListDetail {
    pub id: i32,
    pub name: String,
    pub todos_count: u32,
    pub todos_remaining: u32,
    pub completed: bool,
    pub todos: Vec<TodoView>,
}

impl ListDetail {
    pub fn new(list: TodoList, todos: Vec<Todo>) -> Self {
        let counts = TodoCounts::from_todos(&todos);
        let completed = list_completed_from_todos(&todos);
        let todos = partition_for_display(todos, |todo| todo.completed)
            .into_iter()
            .map(TodoView::from)
            .collect();

        Self {
            id: list.id,
            name: list.name,
            todos_count: counts.todos_count,
            todos_remaining: counts.todos_remaining,
            completed,
            todos,
        }
    }
}

/// Overview rows with open lists first.
pub fn overview_for_display(summaries: Vec<ListSummary>) -> Result<Vec<ListOverview>, DomainError> {
    let overviews = summaries
        .into_iter()
        .map(ListOverview::from_summary)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(partition_for_display(overviews, |list| list.completed))
}

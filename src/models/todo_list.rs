use serde::Serialize;

use super::todo::Todo;

/// Grouping view over the flat todo collection, keyed by `todo_list_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: i64,
    pub name: String,
    pub team_id: Option<i64>,
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Starts a bucket whose name and team come from its first-seen todo.
    pub fn seeded_by(todo: &Todo) -> Self {
        Self {
            id: todo.todo_list_id,
            name: todo.todo_list_name.clone(),
            team_id: todo.team_id,
            todos: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }
}

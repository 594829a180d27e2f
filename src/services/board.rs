use serde::Serialize;

use crate::models::{Todo, TodoKey, TodoList};
use crate::services::aggregation::group_by_list;

/// The page's in-memory todo state: the flat collection and its grouped
/// view. Both are rebuilt together on load and changed together afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoBoard {
    pub todos: Vec<Todo>,
    pub lists: Vec<TodoList>,
}

impl TodoBoard {
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        let lists = group_by_list(&todos);
        Self { todos, lists }
    }

    pub fn find(&self, key: TodoKey) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.key() == key)
    }

    /// Sets the completion flag in both structures. Returns whether anything
    /// matched.
    pub fn set_completed(&mut self, key: TodoKey, completed: bool) -> bool {
        let mut matched = false;
        for todo in self.entries_mut(key) {
            todo.completed = completed;
            matched = true;
        }
        matched
    }

    /// Puts back the snapshot's version of one todo in both structures.
    pub fn restore_from(&mut self, key: TodoKey, snapshot: &TodoBoard) {
        let Some(previous) = snapshot.find(key).cloned() else {
            return;
        };
        for todo in self.entries_mut(key) {
            *todo = previous.clone();
        }
    }

    fn entries_mut(&mut self, key: TodoKey) -> impl Iterator<Item = &mut Todo> {
        self.todos
            .iter_mut()
            .chain(self.lists.iter_mut().flat_map(|list| list.todos.iter_mut()))
            .filter(move |todo| todo.key() == key)
    }
}

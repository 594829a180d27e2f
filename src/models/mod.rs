pub mod todo;
pub mod todo_list;

pub use todo::{PERSONAL_TEAM_SENTINEL, Priority, Todo, TodoKey, TodoSource, UserId};
pub use todo_list::TodoList;

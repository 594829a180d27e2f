use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates;

pub type UserId = i64;

/// Team id the backend uses to mark a user's personal list bucket.
pub const PERSONAL_TEAM_SENTINEL: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Backend code: 1 = low, 2 = medium, 3 = high. Anything else is medium.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Priority::Low,
            Some(3) => Priority::High,
            _ => Priority::Medium,
        }
    }

    /// Sort rank, high first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoSource {
    Personal,
    Team,
}

/// Identifies a todo across both sources; raw ids are only unique per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TodoKey {
    pub source: TodoSource,
    pub id: i64,
}

impl TodoKey {
    pub fn new(id: i64, is_team_todo: bool) -> Self {
        let source = if is_team_todo {
            TodoSource::Team
        } else {
            TodoSource::Personal
        };
        Self { source, id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub priority: Priority,
    pub todo_list_id: i64,
    pub todo_list_name: String,
    /// Local midnight.
    pub start_date: NaiveDateTime,
    /// Local end of day when present.
    pub due_date: Option<NaiveDateTime>,
    pub is_team_todo: bool,
    pub team_id: Option<i64>,
}

impl Todo {
    pub fn key(&self) -> TodoKey {
        TodoKey::new(self.id, self.is_team_todo)
    }

    /// Whether the todo's span `[start_date, due_date]` covers `day`. Without a
    /// due date the span is the start day alone.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => {
                let day_start = dates::start_of_day(day);
                dates::start_of_day(self.start_date.date()) <= day_start
                    && day_start <= dates::end_of_day(due.date())
            }
            None => dates::format_day_key(&self.start_date) == dates::format_day_key(&day),
        }
    }
}

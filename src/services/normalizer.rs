//! Turns the two backend record shapes into the canonical [`Todo`].

use chrono::NaiveDateTime;

use crate::dates;
use crate::error::NormalizeError;
use crate::models::{Priority, Todo};
use crate::remote::dto::{PersonalTodoRecord, TeamTodoRecord};

pub fn normalize_personal(
    record: &PersonalTodoRecord,
    list_name: &str,
) -> Result<Todo, NormalizeError> {
    let id = record.id.ok_or(NormalizeError::MissingField("id"))?;
    let todo_list_id = record.todo_list.ok_or(NormalizeError::MissingField("todoList"))?;
    let start_date = parse_start(present(record.start_date.as_deref()), "startDate")?;
    let due_date = parse_due(record.due_date.as_deref())?;

    Ok(Todo {
        id,
        title: record.title.clone().unwrap_or_default(),
        completed: record.completed.or(record.is_completed).unwrap_or(false),
        priority: Priority::from_code(record.priority),
        todo_list_id,
        todo_list_name: list_name.to_string(),
        start_date,
        due_date,
        is_team_todo: false,
        team_id: None,
    })
}

pub fn normalize_team(record: &TeamTodoRecord) -> Result<Todo, NormalizeError> {
    let id = record.todo_id.ok_or(NormalizeError::MissingField("todoId"))?;
    let todo_list_id = record
        .todo_list_id
        .ok_or(NormalizeError::MissingField("todoListId"))?;
    let start_date = match present(record.start_date.as_deref()) {
        Some(start) => parse_start(Some(start), "startDate")?,
        None => parse_start(present(record.created_at.as_deref()), "createdAt")?,
    };
    let due_date = parse_due(record.due_date.as_deref())?;
    let todo_list_name = present(record.todo_list_name.as_deref())
        .or_else(|| present(record.team_name.as_deref()))
        .unwrap_or_default()
        .to_string();

    Ok(Todo {
        id,
        title: record.title.clone().unwrap_or_default(),
        completed: record.completed.unwrap_or(false),
        priority: Priority::from_code(record.priority),
        todo_list_id,
        todo_list_name,
        start_date,
        due_date,
        is_team_todo: true,
        team_id: record.team_id,
    })
}

/// Blank strings count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_start(value: Option<&str>, field: &'static str) -> Result<NaiveDateTime, NormalizeError> {
    let value = value.ok_or(NormalizeError::MissingField(field))?;
    dates::parse_timestamp(value)
        .map(|start| dates::start_of_day(start.date()))
        .ok_or_else(|| NormalizeError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_due(value: Option<&str>) -> Result<Option<NaiveDateTime>, NormalizeError> {
    match present(value) {
        None => Ok(None),
        Some(value) => dates::parse_timestamp(value)
            .map(|due| Some(dates::end_of_day(due.date())))
            .ok_or_else(|| NormalizeError::InvalidDate {
                field: "dueDate",
                value: value.to_string(),
            }),
    }
}

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::{PERSONAL_TEAM_SENTINEL, Todo, UserId};
use crate::remote::TodoBackend;
use crate::services::normalizer::{normalize_personal, normalize_team};

/// Personal todos: only lists the user owns that sit in the personal bucket
/// contribute, and only todos belonging to those lists are kept.
pub async fn fetch_personal_todos(
    backend: &dyn TodoBackend,
    user_id: UserId,
) -> Result<Vec<Todo>, FetchError> {
    let lists = backend.fetch_todo_lists(user_id).await?;
    let personal_lists: HashMap<i64, String> = lists
        .into_iter()
        .filter(|list| {
            list.user_id == Some(user_id) && list.team_id == Some(PERSONAL_TEAM_SENTINEL)
        })
        .filter_map(|list| Some((list.id?, list.name.unwrap_or_default())))
        .collect();

    if personal_lists.is_empty() {
        info!("User {} has no personal todo lists", user_id);
        return Ok(Vec::new());
    }

    let records = backend.fetch_personal_todos(user_id).await?;
    let mut todos = Vec::new();

    for record in records {
        let Some(list_name) = record.todo_list.and_then(|id| personal_lists.get(&id)) else {
            debug!(
                "Skipping todo {:?}: list {:?} is not a personal list",
                record.id, record.todo_list
            );
            continue;
        };
        match normalize_personal(&record, list_name) {
            Ok(todo) => todos.push(todo),
            Err(e) => {
                warn!("Skipping personal todo {:?}: {}", record.id, e);
            }
        }
    }

    info!(
        "Fetched {} personal todos across {} lists",
        todos.len(),
        personal_lists.len()
    );
    Ok(todos)
}

/// Every todo assigned to the user across teams, in one call.
pub async fn fetch_team_todos(
    backend: &dyn TodoBackend,
    user_id: UserId,
) -> Result<Vec<Todo>, FetchError> {
    let records = backend.fetch_assigned_team_todos().await?;
    let mut todos = Vec::new();

    for record in records {
        match normalize_team(&record) {
            Ok(todo) => todos.push(todo),
            Err(e) => {
                warn!(
                    "Skipping team assignment {:?} (todo {:?}): {}",
                    record.id, record.todo_id, e
                );
            }
        }
    }

    info!("Fetched {} team todos assigned to user {}", todos.len(), user_id);
    Ok(todos)
}

//! Completion toggles: write to the owning endpoint, then apply the server's
//! value to the board, or roll the todo back when the write fails.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, ToggleError};
use crate::models::{TodoKey, TodoSource, UserId};
use crate::remote::TodoBackend;
use crate::services::board::TodoBoard;
use crate::services::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Personal { todo_id: i64 },
    Team { team_id: i64, todo_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ToggleOutcome {
    Committed { action_id: Uuid, completed: bool },
    RolledBack { action_id: Uuid, warning: String },
    /// A toggle for the same todo is still pending.
    Ignored { reason: String },
    /// No acting user; nothing was attempted.
    NoUser,
}

/// Team writes need the todo's team id from the current board; the lookup
/// fails before any request is made.
pub fn resolve_write_target(board: &TodoBoard, key: TodoKey) -> Result<WriteTarget, ToggleError> {
    match key.source {
        TodoSource::Personal => Ok(WriteTarget::Personal { todo_id: key.id }),
        TodoSource::Team => {
            let todo = board.find(key).ok_or(ToggleError::TodoNotFound(key.id))?;
            let team_id = todo.team_id.ok_or(ToggleError::MissingTeamId(key.id))?;
            Ok(WriteTarget::Team {
                team_id,
                todo_id: key.id,
            })
        }
    }
}

pub struct CompletionMutator {
    backend: Arc<dyn TodoBackend>,
    in_flight: Mutex<HashSet<TodoKey>>,
}

struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<TodoKey>>,
    key: TodoKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

impl CompletionMutator {
    pub fn new(backend: Arc<dyn TodoBackend>) -> Self {
        Self {
            backend,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_pending(&self, key: TodoKey) -> Result<bool, AppError> {
        Ok(lock(&self.in_flight, "in-flight toggles")?.contains(&key))
    }

    pub async fn toggle(
        &self,
        board: &Mutex<TodoBoard>,
        user_id: Option<UserId>,
        todo_id: i64,
        is_team_todo: bool,
    ) -> Result<ToggleOutcome, AppError> {
        let Some(user_id) = user_id else {
            return Ok(ToggleOutcome::NoUser);
        };
        let key = TodoKey::new(todo_id, is_team_todo);

        let Some(_guard) = self.begin(key)? else {
            info!("Ignoring toggle of {:?}: a toggle is already pending", key);
            return Ok(ToggleOutcome::Ignored {
                reason: format!("todo {} already has a pending change", todo_id),
            });
        };

        let action_id = Uuid::new_v4();
        info!("Toggle {} of {:?} by user {} pending", action_id, key, user_id);

        let (snapshot, target) = {
            let board = lock(board, "todo board")?;
            (board.clone(), resolve_write_target(&board, key))
        };

        let written = match target {
            Ok(target) => self.write(target).await,
            Err(e) => Err(e),
        };

        let mut board = lock(board, "todo board")?;
        match written {
            Ok(completed) => {
                board.set_completed(key, completed);
                info!("Toggle {} committed: completed={}", action_id, completed);
                Ok(ToggleOutcome::Committed {
                    action_id,
                    completed,
                })
            }
            Err(e) => {
                board.restore_from(key, &snapshot);
                warn!("Toggle {} rolled back: {}", action_id, e);
                Ok(ToggleOutcome::RolledBack {
                    action_id,
                    warning: format!("The change to todo {} was not saved: {}", todo_id, e),
                })
            }
        }
    }

    fn begin(&self, key: TodoKey) -> Result<Option<InFlightGuard<'_>>, AppError> {
        let mut in_flight = lock(&self.in_flight, "in-flight toggles")?;
        if !in_flight.insert(key) {
            return Ok(None);
        }
        Ok(Some(InFlightGuard {
            in_flight: &self.in_flight,
            key,
        }))
    }

    async fn write(&self, target: WriteTarget) -> Result<bool, ToggleError> {
        let completed = match target {
            WriteTarget::Personal { todo_id } => self.backend.toggle_personal_todo(todo_id).await?,
            WriteTarget::Team { team_id, todo_id } => {
                self.backend.toggle_team_todo(team_id, todo_id).await?
            }
        };
        Ok(completed)
    }
}

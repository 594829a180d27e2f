//! The calendar page: identity lookup, the joined source fetch, and the
//! board every view and toggle works against.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::dates;
use crate::error::AppError;
use crate::models::{TodoSource, UserId};
use crate::remote::TodoBackend;
use crate::services::board::TodoBoard;
use crate::services::calendar::{self, DayView, MonthView};
use crate::services::completion::{CompletionMutator, ToggleOutcome};
use crate::services::{fetchers, lock, lock_or_recover};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    Loading,
    LoginRequired,
    #[serde(rename_all = "camelCase")]
    Ready {
        user_id: UserId,
        todo_count: usize,
        list_count: usize,
        /// Sources that contributed nothing because their fetch failed.
        partial_failures: Vec<TodoSource>,
    },
    Failed {
        message: String,
    },
}

pub struct CalendarPage {
    backend: Arc<dyn TodoBackend>,
    mutator: CompletionMutator,
    state: Mutex<PageState>,
    board: Mutex<TodoBoard>,
}

impl CalendarPage {
    pub fn new(backend: Arc<dyn TodoBackend>) -> Self {
        Self {
            mutator: CompletionMutator::new(backend.clone()),
            backend,
            state: Mutex::new(PageState::Loading),
            board: Mutex::new(TodoBoard::default()),
        }
    }

    pub fn mutator(&self) -> &CompletionMutator {
        &self.mutator
    }

    /// Runs the whole load pipeline and replaces the board wholesale. The last
    /// load to finish wins.
    pub async fn load(&self) -> PageState {
        self.set_state(PageState::Loading);

        let next = match self.try_load().await {
            Ok(state) => state,
            Err(e) => {
                error!("Calendar load failed: {}", e);
                self.clear_board();
                PageState::Failed {
                    message: e.to_string(),
                }
            }
        };

        self.set_state(next.clone());
        next
    }

    async fn try_load(&self) -> Result<PageState, AppError> {
        let Some(user_id) = self.backend.current_user().await? else {
            info!("No user logged in, skipping todo fetch");
            self.clear_board();
            return Ok(PageState::LoginRequired);
        };

        let backend = self.backend.as_ref();
        let (personal, team) = tokio::join!(
            fetchers::fetch_personal_todos(backend, user_id),
            fetchers::fetch_team_todos(backend, user_id),
        );

        let mut todos = Vec::new();
        let mut partial_failures = Vec::new();
        for (source, result) in [(TodoSource::Personal, personal), (TodoSource::Team, team)] {
            match result {
                Ok(fetched) => todos.extend(fetched),
                Err(e) => {
                    warn!("{:?} todos unavailable, showing the rest: {}", source, e);
                    partial_failures.push(source);
                }
            }
        }

        let board = TodoBoard::from_todos(todos);
        let state = PageState::Ready {
            user_id,
            todo_count: board.todos.len(),
            list_count: board.lists.len(),
            partial_failures,
        };
        *lock(&self.board, "todo board")? = board;

        info!("Calendar ready for user {}", user_id);
        Ok(state)
    }

    pub fn state(&self) -> PageState {
        lock_or_recover(&self.state, "page state").clone()
    }

    pub fn snapshot(&self) -> Result<TodoBoard, AppError> {
        Ok(lock(&self.board, "todo board")?.clone())
    }

    /// Month grid around `year`/`month`. The selected day defaults to today.
    pub fn month_view(
        &self,
        year: i32,
        month: u32,
        selected: Option<NaiveDate>,
    ) -> Result<MonthView, AppError> {
        self.ready_user()?;
        let anchor = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::BadRequest(format!("no such month: {}-{}", year, month)))?;
        let today = dates::today_midnight().date();
        let board = lock(&self.board, "todo board")?;
        Ok(calendar::build_month(
            anchor,
            selected.unwrap_or(today),
            today,
            &board.todos,
        ))
    }

    pub fn day_view(&self, day: NaiveDate) -> Result<DayView, AppError> {
        self.ready_user()?;
        let board = lock(&self.board, "todo board")?;
        Ok(calendar::build_day_view(day, &board.todos))
    }

    pub async fn toggle(&self, todo_id: i64, is_team_todo: bool) -> Result<ToggleOutcome, AppError> {
        let user_id = self.ready_user()?;
        self.mutator
            .toggle(&self.board, Some(user_id), todo_id, is_team_todo)
            .await
    }

    fn ready_user(&self) -> Result<UserId, AppError> {
        match self.state() {
            PageState::Ready { user_id, .. } => Ok(user_id),
            PageState::LoginRequired => Err(AppError::Unauthorized),
            PageState::Loading => Err(AppError::Conflict("calendar is still loading".to_string())),
            PageState::Failed { message } => {
                Err(AppError::Conflict(format!("calendar failed to load: {}", message)))
            }
        }
    }

    fn set_state(&self, next: PageState) {
        *lock_or_recover(&self.state, "page state") = next;
    }

    fn clear_board(&self) {
        *lock_or_recover(&self.board, "todo board") = TodoBoard::default();
    }
}

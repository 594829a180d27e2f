#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use todo_calendar::error::FetchError;
use todo_calendar::models::UserId;
use todo_calendar::remote::TodoBackend;
use todo_calendar::remote::dto::{PersonalTodoRecord, TeamTodoRecord, TodoListRecord};

pub const USER_ID: UserId = 42;

/// Which endpoint a toggle went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleCall {
    Personal { todo_id: i64 },
    Team { team_id: i64, todo_id: i64 },
}

/// Scriptable in-memory backend. Listings return their configured result on
/// every call; toggle responses are consumed in order.
pub struct FakeBackend {
    user: Mutex<Result<Option<UserId>, FetchError>>,
    lists: Result<Vec<TodoListRecord>, FetchError>,
    personal: Result<Vec<PersonalTodoRecord>, FetchError>,
    team: Result<Vec<TeamTodoRecord>, FetchError>,
    toggle_responses: Mutex<VecDeque<Result<bool, FetchError>>>,
    toggle_gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub toggle_calls: Mutex<Vec<ToggleCall>>,
    pub fetch_calls: AtomicUsize,
}

impl FakeBackend {
    /// A logged-in user with personal list 2 and team list 30 on June 2024.
    pub fn ready() -> Self {
        Self {
            user: Mutex::new(Ok(Some(USER_ID))),
            lists: Ok(sample_lists()),
            personal: Ok(sample_personal_todos()),
            team: Ok(sample_team_todos()),
            toggle_responses: Mutex::new(VecDeque::new()),
            toggle_gate: None,
            calls: Mutex::new(Vec::new()),
            toggle_calls: Mutex::new(Vec::new()),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_user(self, user: Result<Option<UserId>, FetchError>) -> Self {
        self.set_user(user);
        self
    }

    /// Changes what the next identity lookup returns.
    pub fn set_user(&self, user: Result<Option<UserId>, FetchError>) {
        *self.user.lock().unwrap() = user;
    }

    pub fn with_lists(mut self, lists: Result<Vec<TodoListRecord>, FetchError>) -> Self {
        self.lists = lists;
        self
    }

    pub fn with_personal(mut self, personal: Result<Vec<PersonalTodoRecord>, FetchError>) -> Self {
        self.personal = personal;
        self
    }

    pub fn with_team(mut self, team: Result<Vec<TeamTodoRecord>, FetchError>) -> Self {
        self.team = team;
        self
    }

    pub fn with_toggle_responses(self, responses: Vec<Result<bool, FetchError>>) -> Self {
        *self.toggle_responses.lock().unwrap() = responses.into();
        self
    }

    /// Toggle calls block until the gate is notified.
    pub fn with_toggle_gate(mut self, gate: Arc<Notify>) -> Self {
        self.toggle_gate = Some(gate);
        self
    }

    pub fn recorded_calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn recorded_toggles(&self) -> Vec<ToggleCall> {
        self.toggle_calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    async fn respond_to_toggle(&self, call: ToggleCall) -> Result<bool, FetchError> {
        self.toggle_calls.lock().unwrap().push(call);
        if let Some(gate) = self.toggle_gate.clone() {
            gate.notified().await;
        }
        self.toggle_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no scripted toggle response".to_string())))
    }
}

#[async_trait]
impl TodoBackend for FakeBackend {
    async fn current_user(&self) -> Result<Option<UserId>, FetchError> {
        self.record("current_user");
        self.user.lock().unwrap().clone()
    }

    async fn fetch_todo_lists(&self, _user_id: UserId) -> Result<Vec<TodoListRecord>, FetchError> {
        self.record("fetch_todo_lists");
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.lists.clone()
    }

    async fn fetch_personal_todos(&self, _user_id: UserId) -> Result<Vec<PersonalTodoRecord>, FetchError> {
        self.record("fetch_personal_todos");
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.personal.clone()
    }

    async fn fetch_assigned_team_todos(&self) -> Result<Vec<TeamTodoRecord>, FetchError> {
        self.record("fetch_assigned_team_todos");
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.team.clone()
    }

    async fn toggle_personal_todo(&self, todo_id: i64) -> Result<bool, FetchError> {
        self.respond_to_toggle(ToggleCall::Personal { todo_id }).await
    }

    async fn toggle_team_todo(&self, team_id: i64, todo_id: i64) -> Result<bool, FetchError> {
        self.respond_to_toggle(ToggleCall::Team { team_id, todo_id }).await
    }
}

pub fn sample_lists() -> Vec<TodoListRecord> {
    vec![
        TodoListRecord {
            id: Some(2),
            user_id: Some(USER_ID),
            team_id: Some(1),
            name: Some("Inbox".to_string()),
        },
        // Belongs to a team bucket, so it is not a personal list.
        TodoListRecord {
            id: Some(9),
            user_id: Some(USER_ID),
            team_id: Some(5),
            name: Some("Shared".to_string()),
        },
    ]
}

/// Todo 5 spans June 1-3 in list 2; todo 6 sits in a non-personal list and
/// todo 7 has no start date.
pub fn sample_personal_todos() -> Vec<PersonalTodoRecord> {
    vec![
        PersonalTodoRecord {
            id: Some(5),
            title: Some("Write report".to_string()),
            completed: Some(false),
            priority: Some(3),
            todo_list: Some(2),
            start_date: Some("2024-06-01".to_string()),
            due_date: Some("2024-06-03".to_string()),
            ..Default::default()
        },
        PersonalTodoRecord {
            id: Some(8),
            title: Some("buy milk".to_string()),
            is_completed: Some(true),
            priority: Some(1),
            todo_list: Some(2),
            start_date: Some("2024-06-02T08:30:00".to_string()),
            ..Default::default()
        },
        PersonalTodoRecord {
            id: Some(6),
            title: Some("Shared chore".to_string()),
            todo_list: Some(9),
            start_date: Some("2024-06-02".to_string()),
            ..Default::default()
        },
        PersonalTodoRecord {
            id: Some(7),
            title: Some("No start".to_string()),
            todo_list: Some(2),
            ..Default::default()
        },
    ]
}

/// Team todo 5 collides with personal todo 5; team todo 11 has no team id.
pub fn sample_team_todos() -> Vec<TeamTodoRecord> {
    vec![
        TeamTodoRecord {
            id: Some(100),
            todo_id: Some(5),
            title: Some("Review PR".to_string()),
            completed: Some(false),
            priority: Some(2),
            todo_list_id: Some(30),
            todo_list_name: Some("Sprint".to_string()),
            start_date: Some("2024-06-02T09:00:00".to_string()),
            team_id: Some(4),
            ..Default::default()
        },
        TeamTodoRecord {
            id: Some(101),
            todo_id: Some(11),
            title: Some("Orphan".to_string()),
            priority: Some(3),
            todo_list_id: Some(31),
            team_name: Some("Platform".to_string()),
            created_at: Some("2024-06-02T10:00:00".to_string()),
            ..Default::default()
        },
    ]
}

pub fn network_error() -> FetchError {
    FetchError::Network("connection refused".to_string())
}

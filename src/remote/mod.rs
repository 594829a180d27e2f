pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, FetchError};
use crate::models::UserId;

const CURRENT_USER_PATH: &[&str] = &["api", "v1", "user", "me"];
const TODO_LISTS_BY_USER_PATH: &[&str] = &["api", "todo-lists", "user"];
const TODOS_BY_USER_PATH: &[&str] = &["api", "todo", "user"];
const ASSIGNED_TEAM_TODOS_PATH: &[&str] = &["api", "v1", "teams", "todos", "assigned", "me"];
const PERSONAL_TODO_PATH: &[&str] = &["api", "todo"];
const TEAMS_PATH: &[&str] = &["api", "v1", "teams"];

/// The remote todo backend. Every call fails independently with a typed
/// [`FetchError`].
#[async_trait]
pub trait TodoBackend: Send + Sync {
    /// `Ok(None)` means nobody is logged in.
    async fn current_user(&self) -> Result<Option<UserId>, FetchError>;
    async fn fetch_todo_lists(&self, user_id: UserId) -> Result<Vec<dto::TodoListRecord>, FetchError>;
    async fn fetch_personal_todos(&self, user_id: UserId) -> Result<Vec<dto::PersonalTodoRecord>, FetchError>;
    async fn fetch_assigned_team_todos(&self) -> Result<Vec<dto::TeamTodoRecord>, FetchError>;
    /// Returns the completion value the server settled on.
    async fn toggle_personal_todo(&self, todo_id: i64) -> Result<bool, FetchError>;
    async fn toggle_team_todo(&self, team_id: i64, todo_id: i64) -> Result<bool, FetchError>;
}

pub struct ReqwestTodoBackend {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl ReqwestTodoBackend {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            access_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, prefix: &[&str], rest: &[String]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                FetchError::Network(format!("api base url cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(prefix);
            segments.extend(rest);
        }
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
    ) -> Result<dto::Envelope<T>, FetchError> {
        debug!("{} {}", method, url.path());

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{} {}: {}", method, url.path(), e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed reading {}: {}", url.path(), e)))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<dto::Envelope<T>>(&body)
            .map_err(|e| FetchError::Malformed(format!("{}: {}", url.path(), e)))
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        self.request::<T>(Method::GET, url).await?.into_data()
    }

    async fn patch_completion(&self, url: Url) -> Result<bool, FetchError> {
        let data = self
            .request::<dto::CompletionData>(Method::PATCH, url)
            .await?
            .into_data()?;
        data.completed().ok_or_else(|| {
            FetchError::Malformed("toggle response carries no completion value".to_string())
        })
    }
}

#[async_trait]
impl TodoBackend for ReqwestTodoBackend {
    async fn current_user(&self) -> Result<Option<UserId>, FetchError> {
        let url = self.endpoint(CURRENT_USER_PATH, &[])?;
        match self.request::<dto::UserRecord>(Method::GET, url).await {
            Ok(envelope) => Ok(envelope.data.and_then(|user| user.user_id())),
            Err(FetchError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_todo_lists(&self, user_id: UserId) -> Result<Vec<dto::TodoListRecord>, FetchError> {
        let url = self.endpoint(TODO_LISTS_BY_USER_PATH, &[user_id.to_string()])?;
        self.get_data(url).await
    }

    async fn fetch_personal_todos(&self, user_id: UserId) -> Result<Vec<dto::PersonalTodoRecord>, FetchError> {
        let url = self.endpoint(TODOS_BY_USER_PATH, &[user_id.to_string()])?;
        self.get_data(url).await
    }

    async fn fetch_assigned_team_todos(&self) -> Result<Vec<dto::TeamTodoRecord>, FetchError> {
        let url = self.endpoint(ASSIGNED_TEAM_TODOS_PATH, &[])?;
        self.get_data(url).await
    }

    async fn toggle_personal_todo(&self, todo_id: i64) -> Result<bool, FetchError> {
        let url = self.endpoint(
            PERSONAL_TODO_PATH,
            &[todo_id.to_string(), "complete".to_string()],
        )?;
        self.patch_completion(url).await
    }

    async fn toggle_team_todo(&self, team_id: i64, todo_id: i64) -> Result<bool, FetchError> {
        let url = self.endpoint(
            TEAMS_PATH,
            &[
                team_id.to_string(),
                "todos".to_string(),
                todo_id.to_string(),
                "toggle".to_string(),
            ],
        )?;
        self.patch_completion(url).await
    }
}

use serde::Deserialize;

use crate::error::FetchError;

/// `{resultCode, msg, data}` wrapper shared by every backend response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub result_code: Option<serde_json::Value>,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, FetchError> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(FetchError::Malformed(format!(
                "envelope has no data (resultCode={}, msg={})",
                self.result_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                self.msg.unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl UserRecord {
    pub fn user_id(&self) -> Option<i64> {
        self.id.or(self.user_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalTodoRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<i64>,
    /// Owning list id.
    #[serde(default)]
    pub todo_list: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// One assignment row from the "my assigned todos" listing. `id` is the
/// assignment's own id; the todo is identified by `todo_id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTodoRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub todo_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub todo_list_id: Option<i64>,
    #[serde(default)]
    pub todo_list_name: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub team_id: Option<i64>,
}

/// Toggle responses carry either the bare flag or the updated todo.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CompletionData {
    Flag(bool),
    Record(CompletionRecord),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl CompletionData {
    pub fn completed(&self) -> Option<bool> {
        match self {
            CompletionData::Flag(value) => Some(*value),
            CompletionData::Record(record) => record.completed.or(record.is_completed),
        }
    }
}

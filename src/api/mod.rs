use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::dates;
use crate::error::AppError;
use crate::services::calendar::{DayView, MonthView};
use crate::services::{PageState, ToggleOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
struct CalendarQueryParams {
    selected: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    #[serde(default)]
    is_team_todo: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(session))
        .route("/session/load", post(load_session))
        .route("/calendar/{year}/{month}", get(month_view))
        .route("/days/{date}", get(day_view))
        .route("/todos/{id}/toggle", post(toggle_todo))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn session(State(state): State<AppState>) -> Json<PageState> {
    Json(state.page.state())
}

async fn load_session(State(state): State<AppState>) -> Json<PageState> {
    Json(state.page.load().await)
}

async fn month_view(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(params): Query<CalendarQueryParams>,
) -> Result<Json<MonthView>, AppError> {
    let selected = params.selected.as_deref().map(parse_day).transpose()?;
    let view = state.page.month_view(year, month, selected)?;
    Ok(Json(view))
}

async fn day_view(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let view = state.page.day_view(parse_day(&date)?)?;
    Ok(Json(view))
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleOutcome>, AppError> {
    let outcome = state.page.toggle(id, req.is_team_todo).await?;
    Ok(Json(outcome))
}

fn parse_day(value: &str) -> Result<NaiveDate, AppError> {
    dates::parse_day_key(value)
        .ok_or_else(|| AppError::BadRequest(format!("expected YYYY-MM-DD, got '{}'", value)))
}

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;

use crate::commands;
use crate::error::{Result, TrackerError};
use crate::model::{NewTask, Task, TaskFilter, TaskPatch};
use crate::output::{Cleared, Deleted, Health, Metadata, StatsBody, TaskList};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Only plain decimal digits name a task. Anything else, including a sign
/// prefix, is reported as not found.
fn task_id(raw: String) -> Result<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TrackerError::InvalidTaskId(raw));
    }
    raw.parse().map_err(|_| TrackerError::InvalidTaskId(raw))
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| TrackerError::InvalidBody(rejection.body_text()))
}

pub async fn index() -> Json<Metadata> {
    Json(Metadata::current())
}

pub async fn health() -> Json<Health> {
    Json(Health::at(Utc::now()))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsBody>> {
    let stats = state.run(commands::stats::run).await?;
    Ok(Json(StatsBody::from(stats)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TaskList>> {
    let filter = TaskFilter::parse(query.status.as_deref(), query.category.as_deref())?;
    let tasks = state
        .run(move |tracker| commands::list::run(tracker, &filter))
        .await?;
    Ok(Json(TaskList { tasks }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    let id = task_id(id)?;
    state
        .run(move |tracker| commands::show::run(tracker, id))
        .await
        .map(Json)
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>)> {
    let new = body(payload)?;
    let task = state
        .run(move |tracker| commands::create::run(tracker, new))
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>> {
    let id = task_id(id)?;
    let patch = body(payload)?;
    state
        .run(move |tracker| commands::edit::run(tracker, id, patch))
        .await
        .map(Json)
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    let id = task_id(id)?;
    state
        .run(move |tracker| commands::toggle::run(tracker, id))
        .await
        .map(Json)
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>> {
    let id = task_id(id)?;
    let task = state
        .run(move |tracker| commands::delete::run(tracker, id))
        .await?;
    Ok(Json(Deleted::from(task)))
}

pub async fn clear_completed(State(state): State<AppState>) -> Result<Json<Cleared>> {
    let cleared = state.run(commands::clear::run).await?;
    Ok(Json(Cleared::from(cleared)))
}

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::extractors::{extract_json, extract_path, extract_query};
use crate::models::datetime;
use crate::models::{NewReminder, ReminderFilter, ReminderPatch};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReminderQuery {
    #[serde(rename = "author__id")]
    pub author_id: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReminderCreate {
    pub author: i64,
    pub mentions: Vec<i64>,
    pub content: String,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub expiration: DateTime<Utc>,
    pub channel_id: i64,
    pub jump_url: String,
}

/// GET /api/bot/reminders - list reminders, optionally filtered by author and state
pub async fn list_reminders(
    State(state): State<AppState>,
    query: Result<Query<ReminderQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = extract_query(query)?;
    let filter = ReminderFilter {
        author_id: query.author_id,
        active: query.active,
    };

    let reminders = state.reminders.list(&filter).await?;
    if reminders.is_empty() && !filter.is_empty() {
        return Err(ApiError::not_found(
            "There are no reminders with the specified filter values.",
        ));
    }
    Ok(Json(reminders))
}

/// GET /api/bot/reminders/:id - fetch one reminder
pub async fn get_reminder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = extract_path("reminder_id", id)?;
    let reminder = state
        .reminders
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("There is no reminder in the database with that id!"))?;
    Ok(Json(reminder))
}

/// POST /api/bot/reminders - create a reminder for a known user
pub async fn create_reminder(
    State(state): State<AppState>,
    body: Result<Json<ReminderCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = extract_json(body)?;

    if state.users.get(&body.author).await?.is_none() {
        return Err(ApiError::not_found("There is no user with that id in the database!"));
    }

    let draft = NewReminder::new(
        body.author,
        body.mentions,
        body.content,
        body.expiration,
        body.channel_id,
        body.jump_url,
    )?;
    let reminder = state.reminders.create(draft).await?;
    info!(reminder_id = reminder.id, author_id = reminder.author_id, "Created reminder");
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// PATCH /api/bot/reminders/:id - update some fields of a reminder
pub async fn update_reminder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ReminderPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = extract_path("reminder_id", id)?;
    let patch = extract_json(body)?;

    let mut reminder = state
        .reminders
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("There is no reminder with that id in the database!"))?;

    if !patch.is_empty() {
        reminder.apply(patch)?;
        state.reminders.update(&reminder).await?;
    }
    Ok(Json(reminder))
}

/// DELETE /api/bot/reminders/:id - remove a reminder
pub async fn delete_reminder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = extract_path("reminder_id", id)?;
    if state.reminders.get(&id).await?.is_none() {
        return Err(ApiError::not_found("There is no reminder with that id in the database"));
    }
    state.reminders.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

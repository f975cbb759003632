use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::extractors::extract_query;
use crate::models::OffTopicChannelName;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RandomItemsQuery {
    pub random_items: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

/// GET /api/bot/off-topic-channel-names - all names, or a random rotation pick
pub async fn list_names(
    State(state): State<AppState>,
    query: Result<Query<RandomItemsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = extract_query(query)?;
    let names = state.off_topic_channel_names.list(&()).await?;

    let count = match query.random_items {
        None | Some(0) => {
            return Ok(Json(names.into_iter().map(|n| n.name).collect::<Vec<_>>()));
        }
        Some(n) if n < 0 => {
            return Err(ApiError::Messages(vec![
                "'random_items' must be a positive integer.".to_string(),
            ]));
        }
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    };

    let picked = pick_for_rotation(names, count);

    // A used name among the picks means the rotation ran out: start a new one
    // in which exactly the picked names count as used.
    let new_rotation = picked.iter().any(|n| n.used);
    let picked: Vec<String> = picked.into_iter().map(|n| n.name).collect();
    state
        .off_topic_channel_names
        .mark_used(&picked, new_rotation)
        .await?;

    Ok(Json(picked))
}

/// Unused names first, shuffled within each group.
fn pick_for_rotation(mut names: Vec<OffTopicChannelName>, count: usize) -> Vec<OffTopicChannelName> {
    names.shuffle(&mut rand::thread_rng());
    names.sort_by_key(|n| n.used);
    names.truncate(count);
    names
}

/// POST /api/bot/off-topic-channel-names?name= - add a name
pub async fn create_name(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = extract_query(query)?;
    let name = OffTopicChannelName::new(query.name)?;
    let created = state.off_topic_channel_names.create(name).await?;
    info!(name = %created.name, "Added off-topic channel name");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/bot/off-topic-channel-names?name= - remove a name
pub async fn delete_name(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = extract_query(query)?;
    if state.off_topic_channel_names.get(&query.name).await?.is_none() {
        return Err(ApiError::not_found(
            "There is no off topic channel name with that `name` in the database",
        ));
    }
    state.off_topic_channel_names.delete(&query.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

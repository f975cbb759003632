use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub description: &'static str,
    pub commit_sha: String,
    pub timestamp: f64,
}

/// GET / - liveness check with the deployed commit
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheck> {
    let now = Utc::now();
    Json(HealthCheck {
        description: "Python Discord API Health Check",
        commit_sha: state.settings.commit_sha.clone(),
        timestamp: now.timestamp_micros() as f64 / 1_000_000.0,
    })
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Token gate in front of every route. On success the granted `Credentials`
/// are available to handlers as a request extension.
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    match state.auth.authenticate(&path, request.headers()).into_result() {
        Ok(credentials) => {
            request.extensions_mut().insert(credentials);
            next.run(request).await
        }
        Err(err) => {
            debug!(path = %path, reason = %err, "Rejected request");
            ApiError::from(err).into_response()
        }
    }
}

pub mod bot;
pub mod docs;
pub mod health;

use crate::error::ApiError;

/// Fallback for paths outside the `/api` namespace.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

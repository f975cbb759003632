//! Body and query extraction with rejections rendered as structured field errors.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or the query equivalent) and
//! pass it through these helpers, so every malformed request gets the same
//! `{"error": [{"loc", "msg", "type"}]}` shape.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;

use crate::error::{ApiError, FieldError};

pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    result.map(|Json(value)| value).map_err(|rejection| {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "value_error",
            JsonRejection::JsonSyntaxError(_) => "value_error.jsondecode",
            JsonRejection::MissingJsonContentType(_) => "value_error.content_type",
            _ => "value_error.body",
        };
        ApiError::FieldErrors(vec![FieldError::new(&["body"], rejection.body_text(), kind)])
    })
}

pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    result.map(|Query(value)| value).map_err(|rejection| {
        ApiError::FieldErrors(vec![FieldError::new(
            &["query"],
            rejection.body_text(),
            "value_error.query",
        )])
    })
}

pub fn extract_path<T>(
    name: &str,
    result: Result<Path<T>, PathRejection>,
) -> Result<T, ApiError> {
    result.map(|Path(value)| value).map_err(|rejection| {
        ApiError::FieldErrors(vec![FieldError::new(
            &["path", name],
            rejection.body_text(),
            "type_error.integer",
        )])
    })
}

//! Axum handlers. Thin wrappers: all decisions live in [`crate::retrieval`]
//! and [`crate::llm::roadmap`].

pub mod ask;
pub mod catalog;
pub mod roadmap;

use axum::http::StatusCode;
use axum::Json;

use crate::error::CourseError;
use crate::models::ErrorBody;

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Map a mandatory-path failure to an HTTP error with a JSON body.
pub(crate) fn failure(err: CourseError) -> ApiError {
    let status = match &err {
        CourseError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CourseError::EmbeddingUnavailable(_) => StatusCode::BAD_GATEWAY,
        CourseError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!("Request failed: {err}");
    (status, Json(ErrorBody::new(err.to_string())))
}

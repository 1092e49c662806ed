//! HTTP error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use travel_core::TravelError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// Required body fields absent; reported as 404 for client compatibility
    #[error("{0}")]
    MissingFields(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    UpdateFailed(String),
    /// Body missing, not JSON, or of the wrong shape
    #[error("Invalid JSON body: {0}")]
    InvalidJson(JsonRejection),
    #[error(transparent)]
    Internal(TravelError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'a str,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::MissingFields(_) => (StatusCode::NOT_FOUND, "missing_fields"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::UpdateFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "update_failed"),
            ApiError::InvalidJson(rejection) => (rejection.status(), "invalid_body"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl From<TravelError> for ApiError {
    fn from(e: TravelError) -> Self {
        match e {
            TravelError::InvalidId(id) => {
                ApiError::BadRequest(format!("Invalid travel plan id: {}", id))
            }
            TravelError::PlanNotFound(_) => ApiError::NotFound("Plan not found".to_string()),
            TravelError::EmailTaken(_) => ApiError::Conflict("Email already exists".to_string()),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let error = match &self {
            ApiError::Internal(e) => {
                // Details stay in the log, never in the response
                tracing::error!("Request failed: {}", e);
                "Internal server error".to_string()
            }
            ApiError::InvalidJson(JsonRejection::MissingJsonContentType(_)) => {
                "Expected a JSON request body".to_string()
            }
            ApiError::InvalidJson(_) => "Malformed JSON request body".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error, code })).into_response()
    }
}

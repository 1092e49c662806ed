//! Authentication handlers

use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::handlers::{MessageResponse, ReferenceUrl};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};
use travel_core::{LoginRequest, RegistrationRequest};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegistrationRequest>,
) -> Result<(StatusCode, Json<ReferenceUrl>), ApiError> {
    let (credentials, account_name) = req
        .into_parts()
        .ok_or_else(|| ApiError::MissingFields("Data missing".to_string()))?;

    info!("Registration attempt for: {}", credentials.email_id);

    let account_id = state
        .auth_service
        .register(&credentials, account_name.as_deref())
        .await
        .map_err(|e| {
            warn!("Registration failed for {}: {}", credentials.email_id, e);
            ApiError::from(e)
        })?;

    info!("Registration successful for: {}", credentials.email_id);

    let url = format!(
        "{}/api/v1.0/UserAuthentication/register/{}",
        state.public_url, account_id
    );
    Ok((StatusCode::CREATED, Json(ReferenceUrl { url })))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());
    let credentials = req.credentials().ok_or_else(invalid)?;

    info!("Login attempt for: {}", credentials.email_id);

    if state.auth_service.login(&credentials).await? {
        info!("Login successful for: {}", credentials.email_id);
        Ok(Json(MessageResponse::new("Login successful")))
    } else {
        Err(invalid())
    }
}

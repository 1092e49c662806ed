//! Travel plan handlers

use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::handlers::{MessageResponse, ReferenceUrl};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use travel_core::{
    PlanFilter, TravelError, TravelPlan, TravelPlanDraft, TravelPlanPatch, UpdateOutcome,
};

/// Normalize a path id to the store's canonical form.
fn parse_plan_id(raw: &str) -> Result<String, TravelError> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| TravelError::InvalidId(raw.to_string()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TravelPlan>, ApiError> {
    // A malformed id cannot name a stored plan
    let id = parse_plan_id(&id).map_err(|_| TravelError::PlanNotFound(id))?;

    match state.plans.get_plan(&id).await? {
        Some(plan) => Ok(Json(plan)),
        None => Err(TravelError::PlanNotFound(id).into()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PlanFilter>,
) -> Result<Json<Vec<TravelPlan>>, ApiError> {
    let plans = state.plans.list_plans(&filter.normalized()).await?;
    Ok(Json(plans))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<TravelPlanDraft>,
) -> Result<(StatusCode, Json<ReferenceUrl>), ApiError> {
    let new_plan = draft.validate().map_err(|e| {
        warn!("Rejected travel plan: {}", e);
        ApiError::MissingFields("Missing form data".to_string())
    })?;

    let plan = state.plans.insert_plan(new_plan).await?;
    info!(
        "Created travel plan {}: {} -> {} on {}",
        plan.id, plan.departure_location, plan.destination_location, plan.travel_date
    );

    let url = format!(
        "{}/api/v1.0/travelplans/addnewplan/{}",
        state.public_url, plan.id
    );
    Ok((StatusCode::CREATED, Json(ReferenceUrl { url })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TravelPlanPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_plan_id(&id)?;

    match state.plans.update_plan(&id, &patch).await? {
        UpdateOutcome::Modified => {
            info!("Updated travel plan {}", id);
            Ok(Json(MessageResponse::new("Travel plan updated successfully")))
        }
        UpdateOutcome::Unchanged => Err(ApiError::UpdateFailed(
            "Failed to update travel plan: no fields changed".to_string(),
        )),
        UpdateOutcome::NotFound => Err(TravelError::PlanNotFound(id).into()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let invalid = || ApiError::NotFound("Invalid travel plan id".to_string());
    let id = parse_plan_id(&id).map_err(|_| invalid())?;

    if state.plans.delete_plan(&id).await? == 1 {
        info!("Deleted travel plan {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(invalid())
    }
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    message: String,
    deleted: u64,
}

pub async fn clear(State(state): State<AppState>) -> Result<Json<ClearedResponse>, ApiError> {
    let deleted = state.plans.clear_plans().await?;
    info!("Cleared {} travel plans", deleted);

    Ok(Json(ClearedResponse {
        message: format!("Cleared {} travel plans", deleted),
        deleted,
    }))
}

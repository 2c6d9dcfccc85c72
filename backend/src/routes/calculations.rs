//! Nutrition calculation API routes

use crate::error::ApiError;
use crate::services::CalculationService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use nutriplan_shared::types::{
    BatchCalculationRequest, BatchCalculationResponse, CalculationRequest, CalculationResponse,
    PolicyResponse,
};

/// Create calculation routes
pub fn calculation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(calculate))
        .route("/batch", post(calculate_batch))
        .route("/policy", get(get_policy))
}

/// Malformed JSON is reported in the API error envelope rather than axum's plain text
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// POST /api/v1/calculations - Compute BMR, expenditure, target and macros
async fn calculate(
    State(state): State<AppState>,
    body: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let request = parse_body(body)?;
    let response = CalculationService::calculate(state.policy(), request)?;
    Ok(Json(response))
}

/// POST /api/v1/calculations/batch - Recompute many plans in one call
///
/// Answers 200 even when some items fail; each failure is reported in place.
async fn calculate_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchCalculationRequest>, JsonRejection>,
) -> Result<Json<BatchCalculationResponse>, ApiError> {
    let request = parse_body(body)?;
    let response = CalculationService::calculate_batch(
        state.policy(),
        request,
        state.config().api.max_batch_items,
    )?;
    Ok(Json(response))
}

/// GET /api/v1/calculations/policy - Active policy and fixed tables
async fn get_policy(State(state): State<AppState>) -> Json<PolicyResponse> {
    Json(PolicyResponse::new(*state.policy()))
}

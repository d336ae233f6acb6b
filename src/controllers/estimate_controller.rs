use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::models::sizing::{BatchResponse, CandidateTable, EstimateParams, HouseholdRecord, OutputRecord};
use crate::services::result_formatter;
use crate::services::sizing_service;
use crate::shared_state::AppState;

/// POST /api/estimate
/// Size a solar system for one household
///
/// Accepts one household record (monthly bill, optional electricity rate and
/// Solar API potential in any of the three supported shapes) and returns the
/// recommendation in the active output mode. Record-level problems such as an
/// invalid rate are reported inside the body, never as an HTTP error.
#[utoipa::path(
    post,
    path = "/api/estimate",
    params(EstimateParams),
    request_body = HouseholdRecord,
    responses(
        (status = 200, description = "Sizing result or per-record error payload", body = OutputRecord),
        (status = 400, description = "Body is not valid JSON")
    )
)]
pub async fn estimate(
    State(state): State<AppState>,
    Query(params): Query<EstimateParams>,
    Json(record): Json<Value>,
) -> impl IntoResponse {
    let settings = state.settings_for(&params);
    let (output, failed) = sizing_service::calculate(&record, &settings);
    state.record_results(1, u64::from(failed));
    (StatusCode::OK, Json(output)).into_response()
}

/// POST /api/estimate/batch
/// Size a batch of household records
///
/// Returns one item per input record, in order, each carrying its result under
/// `solar_calculation`. A failing record never affects the others.
#[utoipa::path(
    post,
    path = "/api/estimate/batch",
    params(EstimateParams),
    request_body = Vec<HouseholdRecord>,
    responses(
        (status = 200, description = "Records with results attached", body = BatchResponse),
        (status = 400, description = "Body is not a JSON array")
    )
)]
pub async fn estimate_batch(
    State(state): State<AppState>,
    Query(params): Query<EstimateParams>,
    Json(body): Json<Value>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Value::Array(records) = body else {
        return Err(ApiError::BadRequest("expected a JSON array of records".to_string()));
    };
    let settings = state.settings_for(&params);
    let run = sizing_service::calculate_batch(&records, &settings);
    state.record_results(records.len() as u64, run.failed);
    tracing::info!(records = records.len(), failed = run.failed, "batch sized");

    Ok(Json(BatchResponse {
        batch_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        items: run.items,
    }))
}

/// POST /api/estimate/candidates
/// Coverage table for every configuration
///
/// Lists each available configuration in ascending panel order with its system
/// size, derated AC production and usage coverage, plus the one that would be
/// recommended.
#[utoipa::path(
    post,
    path = "/api/estimate/candidates",
    params(EstimateParams),
    request_body = HouseholdRecord,
    responses(
        (status = 200, description = "Coverage table", body = CandidateTable),
        (status = 422, description = "Record could not be evaluated")
    )
)]
pub async fn estimate_candidates(
    State(state): State<AppState>,
    Query(params): Query<EstimateParams>,
    Json(record): Json<Value>,
) -> impl IntoResponse {
    let settings = state.settings_for(&params);
    match sizing_service::candidates(&record, &settings) {
        Ok(table) => (StatusCode::OK, Json(table)).into_response(),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(result_formatter::format_error(&err, settings.output_mode)),
        )
            .into_response(),
    }
}

use axum::{extract::State, response::IntoResponse, Json};

use crate::models::sizing::{HealthStatus, ModeSettings, ModeUpdate};
use crate::shared_state::AppState;

/// GET /api/health
/// Service health and record counters
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    let (records_processed, records_failed) = state.counts();
    let modes = state.modes();
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        records_processed,
        records_failed,
        rate_mode: modes.rate_mode,
        output_mode: modes.output_mode,
    })
}

/// GET /api/settings/modes
/// Active rate and output modes
#[utoipa::path(
    get,
    path = "/api/settings/modes",
    responses(
        (status = 200, description = "Active modes", body = ModeSettings)
    )
)]
pub async fn get_modes(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.modes())
}

/// POST /api/settings/modes
/// Switch rate and/or output mode at runtime
///
/// Omitted fields keep their current value. Applies to every subsequent
/// request that does not override the mode in its query string.
#[utoipa::path(
    post,
    path = "/api/settings/modes",
    request_body = ModeUpdate,
    responses(
        (status = 200, description = "Modes after the update", body = ModeSettings)
    )
)]
pub async fn set_modes(
    State(state): State<AppState>,
    Json(update): Json<ModeUpdate>,
) -> impl IntoResponse {
    Json(state.update_modes(&update))
}

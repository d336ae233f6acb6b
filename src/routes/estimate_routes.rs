use axum::{routing::{get, post}, Router};
use crate::controllers::estimate_controller::{estimate, estimate_batch, estimate_candidates};
use crate::controllers::settings_controller::{get_health, get_modes, set_modes};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/estimate",            post(estimate))
        .route("/estimate/batch",      post(estimate_batch))
        .route("/estimate/candidates", post(estimate_candidates))
        .route("/settings/modes",      get(get_modes).post(set_modes))
        .route("/health",              get(get_health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::CalculatorSettings;

    fn app() -> (Router, AppState) {
        let state = AppState::new(CalculatorSettings::default());
        (Router::new().nest("/api", api_routes(state.clone())), state)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    fn household() -> Value {
        json!({
            "monthly_bill": 160.0,
            "electricity_rate": 0.14,
            "zip_code": 33033,
            "solarPotential": {
                "panelCapacityWatts": 400,
                "solarPanelConfigs": [
                    {"panelsCount": 10, "yearlyEnergyDcKwh": 5800},
                    {"panelsCount": 20, "yearlyEnergyDcKwh": 11600}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_estimate_diagnostic_by_default() {
        let (app, state) = app();
        let (status, body) = send(app, "POST", "/api/estimate", Some(household())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appx_annual_usage_kwh"], json!(13714));
        assert_eq!(body["recommendation"]["panel_count"], json!(20));
        assert_eq!(state.counts(), (1, 0));
    }

    #[tokio::test]
    async fn test_estimate_query_overrides_mode() {
        let (app, _) = app();
        let (status, body) = send(app, "POST", "/api/estimate?mode=client", Some(household())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["possible"], json!(true));
        assert_eq!(body["zip_code"], json!(33033));
        assert_eq!(body["estimated_bill_offset_percentage"], json!(71.9));
    }

    #[tokio::test]
    async fn test_invalid_rate_is_ok_with_error_payload() {
        let (app, state) = app();
        let mut record = household();
        record["electricity_rate"] = json!(0);
        let (status, body) = send(app, "POST", "/api/estimate", Some(record)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "Invalid electricity rate: 0"}));
        assert_eq!(state.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_batch_returns_one_item_per_record() {
        let (app, _) = app();
        let records = json!([household(), {"monthly_bill": 90}, "garbage"]);
        let (status, body) = send(app, "POST", "/api/estimate/batch?mode=client", Some(records)).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["solar_calculation"]["panel_count"], json!(20));
        assert_eq!(items[1]["solar_calculation"]["possible"], json!(false));
        assert!(items[2]["solar_calculation"]["error"].as_str().unwrap().contains("record"));
    }

    #[tokio::test]
    async fn test_batch_rejects_non_array() {
        let (app, _) = app();
        let (status, _) = send(app, "POST", "/api/estimate/batch", Some(household())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_candidates() {
        let (app, _) = app();
        let (status, body) = send(app, "POST", "/api/estimate/candidates", Some(household())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"].as_array().unwrap().len(), 2);
        assert_eq!(body["selected_panel_count"], json!(20));
    }

    #[tokio::test]
    async fn test_mode_toggle_applies_to_later_requests() {
        let (app, _) = app();
        let (status, modes) = send(
            app.clone(),
            "POST",
            "/api/settings/modes",
            Some(json!({"output_mode": "client", "rate_mode": "fixed-rate"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(modes, json!({"rate_mode": "fixed-rate", "output_mode": "client"}));

        let mut record = household();
        record["electricity_rate"] = json!(0);
        let (_, body) = send(app.clone(), "POST", "/api/estimate", Some(record)).await;
        assert_eq!(body["possible"], json!(true));

        let (_, health) = send(app, "GET", "/api/health", None).await;
        assert_eq!(health["output_mode"], json!("client"));
        assert_eq!(health["records_processed"], json!(1));
    }
}

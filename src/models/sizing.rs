use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{OutputMode, RateMode};

// ─── Core domain ─────────────────────────────────────────────────────────────

/// One discrete system size offered for a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    pub panels_count: u32,
    /// Annual DC yield for this configuration (kWh)
    pub yearly_energy_dc_kwh: f64,
}

/// Normalized solar potential, independent of the input shape it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub panel_configs: Vec<PanelConfig>,
    pub panel_watts: f64,
}

/// Result of one pass through the pipeline, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingOutcome {
    pub input_bill: f64,
    pub annual_kwh: f64,
    pub zip_code: serde_json::Value,
    /// `None` only when the site offered no configurations.
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Recommendation {
    pub system_size_kw: f64,
    pub panel_count: u32,
    pub panel_wattage: f64,
    pub est_annual_production_ac_kwh: i64,
    pub offset_percentage: f64,
}

// ─── Output shapes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmptyObject {}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RecommendationSlot {
    Found(Recommendation),
    Empty(EmptyObject),
}

/// Embedded diagnostic form.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DiagnosticResult {
    pub input_bill: f64,
    pub appx_annual_usage_kwh: i64,
    pub found_solution: bool,
    pub recommendation: RecommendationSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DiagnosticError {
    pub error: String,
}

/// Flat client-facing form, success case.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClientResult {
    pub possible: bool,
    #[schema(value_type = Object)]
    pub zip_code: serde_json::Value,
    pub system_size_kw: f64,
    pub panel_count: u32,
    pub panel_wattage: f64,
    pub estimated_annual_production_kwh: i64,
    pub estimated_bill_offset_percentage: f64,
    pub annual_usage_kwh_estimate: i64,
}

/// Flat client-facing form, failure or "not possible" case.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClientFailure {
    pub possible: bool,
    pub error: String,
}

/// The single result produced for one input record.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OutputRecord {
    Diagnostic(DiagnosticResult),
    DiagnosticError(DiagnosticError),
    Client(ClientResult),
    ClientFailure(ClientFailure),
}

// ─── Coverage table ──────────────────────────────────────────────────────────

/// One row of the per-configuration coverage table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CandidateRow {
    pub panel_count: u32,
    pub system_size_kw: f64,
    pub est_annual_production_ac_kwh: i64,
    pub coverage_percentage: f64,
    pub meets_usage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CandidateTable {
    pub appx_annual_usage_kwh: i64,
    pub panel_wattage: f64,
    pub performance_ratio: f64,
    pub selected_panel_count: Option<u32>,
    pub candidates: Vec<CandidateRow>,
}

// ─── REST API types ──────────────────────────────────────────────────────────

/// Schema-only type for the OpenAPI document; never constructed. Handlers
/// take the body as a raw JSON object and unknown fields pass through
/// untouched.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
pub struct HouseholdRecord {
    pub monthly_bill: Option<f64>,
    pub electricity_rate: Option<f64>,
    #[schema(value_type = Object)]
    pub zip_code: Option<serde_json::Value>,
    /// `{ solarPotential: { panelCapacityWatts, solarPanelConfigs } }`
    #[schema(value_type = Object)]
    pub google_solar_response: Option<serde_json::Value>,
    /// Same content as `google_solar_response.solarPotential`
    #[serde(rename = "solarPotential")]
    #[schema(value_type = Object)]
    pub solar_potential: Option<serde_json::Value>,
    #[serde(rename = "solarPanelConfigs")]
    #[schema(value_type = Vec<Object>)]
    pub solar_panel_configs: Option<Vec<serde_json::Value>>,
    #[serde(rename = "panelCapacityWatts")]
    pub panel_capacity_watts: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchResponse {
    pub batch_id: uuid::Uuid,
    pub generated_at: DateTime<Utc>,
    /// Input records, each with `solar_calculation` attached
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<serde_json::Value>,
}

/// Per-call overrides for `/api/estimate*`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EstimateParams {
    pub mode: Option<OutputMode>,
    pub rate_mode: Option<RateMode>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModeSettings {
    pub rate_mode: RateMode,
    pub output_mode: OutputMode,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ModeUpdate {
    pub rate_mode: Option<RateMode>,
    pub output_mode: Option<OutputMode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub records_processed: u64,
    pub records_failed: u64,
    pub rate_mode: RateMode,
    pub output_mode: OutputMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recommendation_serializes_as_empty_object() {
        let result = DiagnosticResult {
            input_bill: 160.0,
            appx_annual_usage_kwh: 13714,
            found_solution: false,
            recommendation: RecommendationSlot::Empty(EmptyObject {}),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"input_bill":160.0,"appx_annual_usage_kwh":13714,"found_solution":false,"recommendation":{}}"#
        );
    }

    #[test]
    fn test_output_record_is_untagged() {
        let out = OutputRecord::ClientFailure(ClientFailure {
            possible: false,
            error: "Invalid electricity rate: 0".into(),
        });
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"possible": false, "error": "Invalid electricity rate: 0"})
        );
    }
}

use crate::config::OutputMode;
use crate::error::SizingError;
use crate::models::sizing::{
    CandidateRow, ClientFailure, ClientResult, DiagnosticError, DiagnosticResult, EmptyObject,
    OutputRecord, PanelConfig, Recommendation, RecommendationSlot, SizingOutcome,
};
use crate::services::config_selector::ac_kwh;

pub const NO_CONFIGURATION_MESSAGE: &str =
    "No solar panel configurations available for this location";

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn round_kwh(value: f64) -> i64 {
    value.round() as i64
}

pub fn system_size_kw(config: &PanelConfig, panel_watts: f64) -> f64 {
    (config.panels_count as f64 * panel_watts) / 1000.0
}

/// AC production as a percentage of usage; 0 when usage is not positive.
pub fn offset_percentage(ac_production_kwh: f64, annual_kwh: f64) -> f64 {
    if annual_kwh > 0.0 {
        (ac_production_kwh / annual_kwh) * 100.0
    } else {
        0.0
    }
}

pub fn recommendation(config: &PanelConfig, panel_watts: f64, annual_kwh: f64) -> Recommendation {
    let ac_production = ac_kwh(config);
    Recommendation {
        system_size_kw: round_to(system_size_kw(config, panel_watts), 2),
        panel_count: config.panels_count,
        panel_wattage: panel_watts,
        est_annual_production_ac_kwh: round_kwh(ac_production),
        offset_percentage: round_to(offset_percentage(ac_production, annual_kwh), 1),
    }
}

pub fn candidate_row(config: &PanelConfig, panel_watts: f64, annual_kwh: f64) -> CandidateRow {
    let ac_production = ac_kwh(config);
    CandidateRow {
        panel_count: config.panels_count,
        system_size_kw: round_to(system_size_kw(config, panel_watts), 2),
        est_annual_production_ac_kwh: round_kwh(ac_production),
        coverage_percentage: round_to(offset_percentage(ac_production, annual_kwh), 1),
        meets_usage: ac_production >= annual_kwh,
    }
}

pub fn format(outcome: &SizingOutcome, mode: OutputMode) -> OutputRecord {
    match mode {
        OutputMode::Diagnostic => OutputRecord::Diagnostic(DiagnosticResult {
            input_bill: outcome.input_bill,
            appx_annual_usage_kwh: round_kwh(outcome.annual_kwh),
            found_solution: outcome.recommendation.is_some(),
            recommendation: match &outcome.recommendation {
                Some(rec) => RecommendationSlot::Found(rec.clone()),
                None => RecommendationSlot::Empty(EmptyObject {}),
            },
        }),
        OutputMode::Client => match &outcome.recommendation {
            Some(rec) => OutputRecord::Client(ClientResult {
                possible: true,
                zip_code: outcome.zip_code.clone(),
                system_size_kw: rec.system_size_kw,
                panel_count: rec.panel_count,
                panel_wattage: rec.panel_wattage,
                estimated_annual_production_kwh: rec.est_annual_production_ac_kwh,
                estimated_bill_offset_percentage: rec.offset_percentage,
                annual_usage_kwh_estimate: round_kwh(outcome.annual_kwh),
            }),
            None => OutputRecord::ClientFailure(ClientFailure {
                possible: false,
                error: NO_CONFIGURATION_MESSAGE.to_string(),
            }),
        },
    }
}

pub fn format_error(error: &SizingError, mode: OutputMode) -> OutputRecord {
    match mode {
        OutputMode::Diagnostic => OutputRecord::DiagnosticError(DiagnosticError {
            error: error.to_string(),
        }),
        OutputMode::Client => OutputRecord::ClientFailure(ClientFailure {
            possible: false,
            error: error.to_string(),
        }),
    }
}

//! Per-record sizing pipeline: resolve → estimate → select → format.
//!
//! Every record is a pure function of its own JSON and the active settings.
//! Failures are caught here, at the record boundary, and turned into an
//! error payload so one bad record never affects its neighbours.

use serde_json::{Map, Value};

use crate::config::CalculatorSettings;
use crate::error::SizingError;
use crate::models::sizing::{CandidateTable, OutputRecord, ResolvedInputs, SizingOutcome};
use crate::services::config_selector::{self, PERFORMANCE_RATIO};
use crate::services::usage_estimator::{self, BillingInputs};
use crate::services::{result_formatter, schema_resolver};

/// Key under which batch results are attached to the caller's record.
pub const RESULT_KEY: &str = "solar_calculation";

fn as_record(input: &Value) -> Result<&Map<String, Value>, SizingError> {
    input
        .as_object()
        .ok_or_else(|| SizingError::malformed("record", "expected a JSON object"))
}

/// Steps shared by every entry point: locate the solar data, apply billing
/// defaults and derive annual usage.
fn prepare(
    record: &Map<String, Value>,
    settings: &CalculatorSettings,
) -> Result<(ResolvedInputs, BillingInputs, f64), SizingError> {
    let resolved = schema_resolver::resolve(record, settings.default_panel_watts)?;
    let billing = usage_estimator::billing_inputs(record, settings)?;
    let annual_kwh = usage_estimator::annual_kwh(billing, settings.rate_mode)?;
    Ok((resolved, billing, annual_kwh))
}

/// Runs the pipeline without formatting.
pub fn evaluate(input: &Value, settings: &CalculatorSettings) -> Result<SizingOutcome, SizingError> {
    let record = as_record(input)?;
    let (resolved, billing, annual_kwh) = prepare(record, settings)?;

    let selected = config_selector::select(&resolved.panel_configs, annual_kwh);
    let recommendation = selected
        .map(|config| result_formatter::recommendation(config, resolved.panel_watts, annual_kwh));

    Ok(SizingOutcome {
        input_bill: billing.monthly_bill,
        annual_kwh,
        zip_code: record.get("zip_code").cloned().unwrap_or(Value::Null),
        recommendation,
    })
}

/// Evaluates and formats one record. The second element is `true` when the
/// record failed (invalid rate or malformed input).
pub fn calculate(input: &Value, settings: &CalculatorSettings) -> (OutputRecord, bool) {
    match evaluate(input, settings) {
        Ok(outcome) => {
            tracing::debug!(
                annual_kwh = outcome.annual_kwh,
                panel_count = outcome.recommendation.as_ref().map(|r| r.panel_count),
                "record sized"
            );
            (result_formatter::format(&outcome, settings.output_mode), false)
        }
        Err(err) => {
            tracing::warn!(error = %err, "record rejected");
            (result_formatter::format_error(&err, settings.output_mode), true)
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchRun {
    pub items: Vec<Value>,
    pub failed: u64,
}

/// One output item per input, in input order. Each object record gets its
/// result attached under [`RESULT_KEY`] with passthrough fields intact; a
/// non-object element is wrapped as `{"json": <element>, ...}`.
pub fn calculate_batch(inputs: &[Value], settings: &CalculatorSettings) -> BatchRun {
    let mut failed = 0;
    let items = inputs
        .iter()
        .map(|input| {
            let (output, is_error) = calculate(input, settings);
            if is_error {
                failed += 1;
            }
            let mut item = match input {
                Value::Object(map) => map.clone(),
                other => {
                    let mut wrapper = Map::new();
                    wrapper.insert("json".to_string(), other.clone());
                    wrapper
                }
            };
            let output = serde_json::to_value(&output).unwrap_or_else(|e| {
                serde_json::json!({ "error": format!("failed to serialize result: {}", e) })
            });
            item.insert(RESULT_KEY.to_string(), output);
            Value::Object(item)
        })
        .collect();
    BatchRun { items, failed }
}

/// Coverage of every configuration in ascending panel order, with the one
/// [`config_selector::select`] picks.
pub fn candidates(input: &Value, settings: &CalculatorSettings) -> Result<CandidateTable, SizingError> {
    let record = as_record(input)?;
    let (resolved, _, annual_kwh) = prepare(record, settings)?;

    let rows: Vec<_> = config_selector::ordered(&resolved.panel_configs)
        .into_iter()
        .map(|config| result_formatter::candidate_row(config, resolved.panel_watts, annual_kwh))
        .collect();
    for row in &rows {
        tracing::trace!(
            panels = row.panel_count,
            system_kw = row.system_size_kw,
            ac_kwh = row.est_annual_production_ac_kwh,
            coverage = row.coverage_percentage,
            "candidate"
        );
    }

    Ok(CandidateTable {
        appx_annual_usage_kwh: annual_kwh.round() as i64,
        panel_wattage: resolved.panel_watts,
        performance_ratio: PERFORMANCE_RATIO,
        selected_panel_count: config_selector::select(&resolved.panel_configs, annual_kwh)
            .map(|c| c.panels_count),
        candidates: rows,
    })
}

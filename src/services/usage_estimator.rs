use serde_json::{Map, Value};

use crate::config::{CalculatorSettings, RateMode};
use crate::error::SizingError;

/// Billing inputs after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingInputs {
    pub monthly_bill: f64,
    pub electricity_rate: f64,
}

/// Reads a loosely typed numeric value. `Ok(None)` for absent, null, `false`
/// and blank strings. Numeric strings are parsed.
pub fn lenient_number(value: Option<&Value>, field: &str) -> Result<Option<f64>, SizingError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| SizingError::malformed(field, "number out of range")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| SizingError::malformed(field, format!("expected a number, got {:?}", s))),
        Some(other) => Err(SizingError::malformed(
            field,
            format!("expected a number, got {}", other),
        )),
    }
}

fn read_number(record: &Map<String, Value>, field: &str) -> Result<Option<f64>, SizingError> {
    lenient_number(record.get(field), field)
}

pub fn billing_inputs(
    record: &Map<String, Value>,
    settings: &CalculatorSettings,
) -> Result<BillingInputs, SizingError> {
    let monthly_bill = match read_number(record, "monthly_bill")? {
        None => settings.default_monthly_bill,
        Some(b) if b == 0.0 => settings.default_monthly_bill,
        Some(b) if b < 0.0 => {
            return Err(SizingError::malformed(
                "monthly_bill",
                format!("must not be negative, got {}", b),
            ));
        }
        Some(b) => b,
    };

    let electricity_rate = match settings.rate_mode {
        RateMode::FixedRate => settings.fixed_rate,
        RateMode::ValidateRate => read_number(record, "electricity_rate")?
            .unwrap_or(settings.default_electricity_rate),
    };

    Ok(BillingInputs { monthly_bill, electricity_rate })
}

/// Annual consumption in kWh: `(monthly_bill / rate) * 12`.
pub fn annual_kwh(inputs: BillingInputs, rate_mode: RateMode) -> Result<f64, SizingError> {
    if rate_mode == RateMode::ValidateRate && inputs.electricity_rate <= 0.0 {
        return Err(SizingError::InvalidRate(inputs.electricity_rate));
    }
    let annual = (inputs.monthly_bill / inputs.electricity_rate) * 12.0;
    if !annual.is_finite() {
        if !(inputs.monthly_bill * 12.0).is_finite() {
            return Err(SizingError::malformed(
                "monthly_bill",
                format!("too large, got {}", inputs.monthly_bill),
            ));
        }
        return Err(SizingError::InvalidRate(inputs.electricity_rate));
    }
    Ok(annual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn fixed() -> CalculatorSettings {
        CalculatorSettings { rate_mode: RateMode::FixedRate, fixed_rate: 0.2, ..Default::default() }
    }

    #[test]
    fn test_reference_household() {
        let settings = CalculatorSettings::default();
        let inputs = billing_inputs(&record(json!({"monthly_bill": 160.0, "electricity_rate": 0.14})), &settings).unwrap();
        let kwh = annual_kwh(inputs, settings.rate_mode).unwrap();
        assert_eq!(kwh.round(), 13714.0);
    }

    #[rstest]
    #[case::absent(json!({}))]
    #[case::null(json!({"monthly_bill": null, "electricity_rate": null}))]
    #[case::falsy(json!({"monthly_bill": 0, "electricity_rate": false}))]
    #[case::blank_strings(json!({"monthly_bill": "", "electricity_rate": "  "}))]
    fn test_defaults(#[case] input: Value) {
        let inputs = billing_inputs(&record(input), &CalculatorSettings::default()).unwrap();
        assert_eq!(inputs, BillingInputs { monthly_bill: 160.0, electricity_rate: 0.14 });
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let inputs = billing_inputs(
            &record(json!({"monthly_bill": "200", "electricity_rate": " 0.25 "})),
            &CalculatorSettings::default(),
        )
        .unwrap();
        assert_eq!(inputs, BillingInputs { monthly_bill: 200.0, electricity_rate: 0.25 });
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.1)]
    fn test_non_positive_rate_rejected(#[case] rate: f64) {
        let settings = CalculatorSettings::default();
        let inputs = billing_inputs(&record(json!({"monthly_bill": 100, "electricity_rate": rate})), &settings).unwrap();
        assert_eq!(annual_kwh(inputs, settings.rate_mode), Err(SizingError::InvalidRate(rate)));
    }

    #[test]
    fn test_vanishing_rate_does_not_overflow_usage() {
        let settings = CalculatorSettings::default();
        let inputs = billing_inputs(&record(json!({"monthly_bill": 160, "electricity_rate": 1e-310})), &settings).unwrap();
        assert_eq!(annual_kwh(inputs, settings.rate_mode), Err(SizingError::InvalidRate(1e-310)));
    }

    #[test]
    fn test_huge_bill_is_malformed() {
        let settings = CalculatorSettings { rate_mode: RateMode::FixedRate, ..Default::default() };
        let inputs = billing_inputs(&record(json!({"monthly_bill": 1e308})), &settings).unwrap();
        let err = annual_kwh(inputs, settings.rate_mode).unwrap_err();
        assert!(matches!(err, SizingError::MalformedInput { ref field, .. } if field == "monthly_bill"), "got {err:?}");
    }

    #[test]
    fn test_fixed_rate_ignores_supplied_rate() {
        let settings = fixed();
        let inputs = billing_inputs(&record(json!({"monthly_bill": 100, "electricity_rate": 0})), &settings).unwrap();
        assert_eq!(inputs.electricity_rate, 0.2);
        assert_eq!(annual_kwh(inputs, settings.rate_mode).unwrap().round(), 6000.0);
    }

    #[test]
    fn test_fixed_rate_ignores_malformed_rate() {
        let inputs = billing_inputs(&record(json!({"electricity_rate": "cheap"})), &fixed()).unwrap();
        assert_eq!(inputs.electricity_rate, 0.2);
    }

    #[rstest]
    #[case::bill_text(json!({"monthly_bill": "a lot"}))]
    #[case::bill_object(json!({"monthly_bill": {"amount": 100}}))]
    #[case::bill_negative(json!({"monthly_bill": -5}))]
    #[case::rate_array(json!({"electricity_rate": [0.1]}))]
    fn test_malformed(#[case] input: Value) {
        let err = billing_inputs(&record(input), &CalculatorSettings::default()).unwrap_err();
        assert!(matches!(err, SizingError::MalformedInput { .. }), "got {err:?}");
    }
}

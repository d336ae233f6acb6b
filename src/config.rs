use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;

fn default_port() -> u16 { 8080 }
fn default_fixed_rate() -> f64 { 0.14 }
fn default_monthly_bill() -> f64 { 160.0 }
fn default_electricity_rate() -> f64 { 0.14 }
fn default_panel_watts() -> f64 { 400.0 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub calculator: CalculatorSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// How the per-unit electricity price is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RateMode {
    /// Use the record's `electricity_rate` and reject values <= 0.
    #[default]
    ValidateRate,
    /// Ignore the record's rate and use `fixed_rate`.
    FixedRate,
}

/// Which of the two result shapes the formatter emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Embedded form: `{input_bill, appx_annual_usage_kwh, found_solution, recommendation}`
    #[default]
    Diagnostic,
    /// Flat client-facing form: `{possible, zip_code, system_size_kw, ...}`
    Client,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
pub struct CalculatorSettings {
    #[serde(default)]
    pub rate_mode: RateMode,
    #[serde(default)]
    pub output_mode: OutputMode,
    /// Price per kWh used in fixed-rate mode
    #[serde(default = "default_fixed_rate")]
    pub fixed_rate: f64,
    #[serde(default = "default_monthly_bill")]
    pub default_monthly_bill: f64,
    #[serde(default = "default_electricity_rate")]
    pub default_electricity_rate: f64,
    #[serde(default = "default_panel_watts")]
    pub default_panel_watts: f64,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            rate_mode: RateMode::default(),
            output_mode: OutputMode::default(),
            fixed_rate: default_fixed_rate(),
            default_monthly_bill: default_monthly_bill(),
            default_electricity_rate: default_electricity_rate(),
            default_panel_watts: default_panel_watts(),
        }
    }
}

impl CalculatorSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("fixed_rate", self.fixed_rate),
            ("default_monthly_bill", self.default_monthly_bill),
            ("default_electricity_rate", self.default_electricity_rate),
            ("default_panel_watts", self.default_panel_watts),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "calculator.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(path, &content)
    }

    /// Like [`Config::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path, "config file not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    fn from_json(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.calculator.validate()?;
        Ok(config)
    }
}

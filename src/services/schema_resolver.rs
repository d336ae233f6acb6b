//! Locates solar-potential data in an input record.
//!
//! Upstream integrations deliver the Solar API payload in one of three
//! shapes. Each shape is a [`SolarSource`] variant; they are tried in
//! [`SolarSource::PRIORITY`] order and the first one present wins.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SizingError;
use crate::models::sizing::{PanelConfig, ResolvedInputs};
use crate::services::usage_estimator::lenient_number;

const CONFIGS_KEY: &str = "solarPanelConfigs";
const WATTS_KEY: &str = "panelCapacityWatts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarSource {
    /// `google_solar_response.solarPotential.*`
    Nested,
    /// `solarPotential.*`
    Intermediate,
    /// `solarPanelConfigs` / `panelCapacityWatts` at the top level
    Flat,
}

impl SolarSource {
    pub const PRIORITY: [SolarSource; 3] =
        [SolarSource::Nested, SolarSource::Intermediate, SolarSource::Flat];

    fn path(self) -> &'static [&'static str] {
        match self {
            SolarSource::Nested => &["google_solar_response", "solarPotential"],
            SolarSource::Intermediate => &["solarPotential"],
            SolarSource::Flat => &[],
        }
    }

    fn label(self) -> String {
        self.path()
            .iter()
            .copied()
            .chain(std::iter::once(CONFIGS_KEY))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The layer holding `solarPanelConfigs` for this shape, if the key is
    /// present and non-null. Missing or non-object ancestors simply don't match.
    fn locate(self, record: &Map<String, Value>) -> Option<PotentialLayer<'_>> {
        let mut layer = record;
        for key in self.path() {
            layer = layer.get(*key)?.as_object()?;
        }
        match layer.get(CONFIGS_KEY) {
            None | Some(Value::Null) => None,
            Some(configs) => Some(PotentialLayer {
                source: self,
                configs,
                watts: layer.get(WATTS_KEY),
            }),
        }
    }
}

/// Borrowed view of the matched layer; nothing is copied until parsing.
#[derive(Debug, Clone, Copy)]
pub struct PotentialLayer<'a> {
    pub source: SolarSource,
    configs: &'a Value,
    watts: Option<&'a Value>,
}

/// Wire form of one configuration entry. Unknown Solar API fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPanelConfig {
    #[serde(default)]
    panels_count: Option<f64>,
    #[serde(default)]
    yearly_energy_dc_kwh: Option<f64>,
}

/// Which shape matched, if any.
pub fn detect(record: &Map<String, Value>) -> Option<PotentialLayer<'_>> {
    SolarSource::PRIORITY
        .into_iter()
        .find_map(|source| source.locate(record))
}

pub fn resolve(record: &Map<String, Value>, default_watts: f64) -> Result<ResolvedInputs, SizingError> {
    let Some(layer) = detect(record) else {
        return Ok(ResolvedInputs {
            panel_configs: Vec::new(),
            panel_watts: default_watts,
        });
    };
    let label = layer.source.label();

    let raw_configs = Vec::<RawPanelConfig>::deserialize(layer.configs)
        .map_err(|e| SizingError::malformed(label.as_str(), e.to_string()))?;

    let panel_watts = match lenient_number(layer.watts, WATTS_KEY)? {
        None => default_watts,
        Some(w) if w == 0.0 => default_watts,
        Some(w) if w < 0.0 => {
            return Err(SizingError::malformed(
                WATTS_KEY,
                format!("must not be negative, got {}", w),
            ));
        }
        Some(w) => w,
    };

    let panel_configs = raw_configs
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let yearly_energy_dc_kwh = raw.yearly_energy_dc_kwh.unwrap_or(0.0);
            if yearly_energy_dc_kwh < 0.0 {
                return Err(SizingError::malformed(
                    format!("{}[{}].yearlyEnergyDcKwh", label, i),
                    format!("must not be negative, got {}", yearly_energy_dc_kwh),
                ));
            }
            Ok(PanelConfig {
                panels_count: panel_count(raw.panels_count, &label, i)?,
                yearly_energy_dc_kwh,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedInputs { panel_configs, panel_watts })
}

/// Counts arrive as JSON numbers; `20` and `20.0` are the same count.
fn panel_count(raw: Option<f64>, label: &str, index: usize) -> Result<u32, SizingError> {
    match raw {
        None => Ok(0),
        Some(n) if n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&n) => Ok(n as u32),
        Some(n) => Err(SizingError::malformed(
            format!("{}[{}].panelsCount", label, index),
            format!("expected a non-negative whole number, got {}", n),
        )),
    }
}

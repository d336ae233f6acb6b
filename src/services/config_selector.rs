use crate::models::sizing::PanelConfig;

/// DC-to-AC derating applied to every configuration's yearly yield
/// (inverter losses, wiring, soiling, shading the API doesn't capture).
pub const PERFORMANCE_RATIO: f64 = 0.85;

pub fn ac_kwh(config: &PanelConfig) -> f64 {
    config.yearly_energy_dc_kwh * PERFORMANCE_RATIO
}

/// Configurations by ascending panel count. The sort is stable, so equal
/// counts keep their input order.
pub fn ordered(configs: &[PanelConfig]) -> Vec<&PanelConfig> {
    let mut sorted: Vec<&PanelConfig> = configs.iter().collect();
    sorted.sort_by_key(|c| c.panels_count);
    sorted
}

/// Smallest configuration whose derated yield covers `annual_kwh`, else the
/// largest one. `None` only for an empty slice.
///
/// The returned reference always points into `configs`.
pub fn select(configs: &[PanelConfig], annual_kwh: f64) -> Option<&PanelConfig> {
    let sorted = ordered(configs);
    sorted
        .iter()
        .copied()
        .find(|c| ac_kwh(c) >= annual_kwh)
        .or_else(|| sorted.last().copied())
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::config::CalculatorSettings;
use crate::models::sizing::{EstimateParams, ModeSettings, ModeUpdate};

#[derive(Clone, Debug)]
pub struct AppState {
    /// Calculator settings; the two modes can be toggled at runtime via API
    pub settings: Arc<RwLock<CalculatorSettings>>,
    pub started_at: Instant,
    pub records_processed: Arc<AtomicU64>,
    pub records_failed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(settings: CalculatorSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            started_at: Instant::now(),
            records_processed: Arc::new(AtomicU64::new(0)),
            records_failed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the active settings. A poisoned lock still holds valid
    /// settings, so its contents are used as-is.
    pub fn settings(&self) -> CalculatorSettings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Settings for one call, with query overrides applied.
    pub fn settings_for(&self, params: &EstimateParams) -> CalculatorSettings {
        let mut settings = self.settings();
        if let Some(mode) = params.mode {
            settings.output_mode = mode;
        }
        if let Some(rate_mode) = params.rate_mode {
            settings.rate_mode = rate_mode;
        }
        settings
    }

    pub fn modes(&self) -> ModeSettings {
        let settings = self.settings();
        ModeSettings {
            rate_mode: settings.rate_mode,
            output_mode: settings.output_mode,
        }
    }

    pub fn update_modes(&self, update: &ModeUpdate) -> ModeSettings {
        {
            let mut guard = match self.settings.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(rate_mode) = update.rate_mode {
                guard.rate_mode = rate_mode;
            }
            if let Some(output_mode) = update.output_mode {
                guard.output_mode = output_mode;
            }
        }
        let modes = self.modes();
        tracing::info!(rate_mode = ?modes.rate_mode, output_mode = ?modes.output_mode, "calculator modes updated");
        modes
    }

    pub fn record_results(&self, processed: u64, failed: u64) {
        self.records_processed.fetch_add(processed, Ordering::Relaxed);
        self.records_failed.fetch_add(failed, Ordering::Relaxed);
    }

    pub fn counts(&self) -> (u64, u64) {
        (
            self.records_processed.load(Ordering::Relaxed),
            self.records_failed.load(Ordering::Relaxed),
        )
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

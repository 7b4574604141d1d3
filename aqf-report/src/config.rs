use aqf_forecast::ModelConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Full,
    Quick,
}

/// Tunables of one analysis run. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub full_horizon_days: usize,
    pub quick_horizon_days: usize,
    /// Number of most recent observations summarized in `statistics`.
    pub recent_window: usize,
    /// Concentration above which a day counts towards `days_above_safe`.
    pub safe_threshold: f64,
    pub fit_timeout_secs: u64,
    pub model: ModelConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            full_horizon_days: 30,
            quick_horizon_days: 7,
            recent_window: 30,
            safe_threshold: 35.0,
            fit_timeout_secs: 120,
            model: ModelConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Forecast horizon of a mode, never less than one day.
    pub fn horizon(&self, mode: AnalysisMode) -> usize {
        let days = match mode {
            AnalysisMode::Full => self.full_horizon_days,
            AnalysisMode::Quick => self.quick_horizon_days,
        };
        days.max(1)
    }

    pub fn fit_timeout(&self) -> Duration {
        Duration::from_secs(self.fit_timeout_secs)
    }
}

mod thresholds;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GradingError, Result};

pub use thresholds::{
    PullupConfig, PushupConfig, PushupValidationConfig, RepCounterConfig, RunningConfig,
    SitupConfig,
};

/// Every tunable threshold of the grading engine, grouped per component.
///
/// All sections are optional in TOML; missing keys fall back to the standard test values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    #[serde(default)]
    pub rep_counter: RepCounterConfig,

    #[serde(default)]
    pub pushup: PushupConfig,

    #[serde(default)]
    pub situp: SitupConfig,

    #[serde(default)]
    pub pullup: PullupConfig,

    #[serde(default)]
    pub running: RunningConfig,
}

impl GradingConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: GradingConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!("Grading config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Render configuration as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would make the engine misbehave
    pub fn validate(&self) -> Result<()> {
        if self.rep_counter.state_stability_threshold == 0 {
            return Err(GradingError::InvalidConfig(
                "rep_counter.state_stability_threshold must be at least 1".to_string(),
            ));
        }

        let visibilities = [
            ("pushup", self.pushup.visibility_threshold),
            ("situp", self.situp.visibility_threshold),
            ("pullup", self.pullup.visibility_threshold),
        ];
        for (section, threshold) in visibilities {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(GradingError::InvalidConfig(format!(
                    "{section}.visibility_threshold must be within 0..=1, got {threshold}"
                )));
            }
        }

        if self.pushup.max_elbow_flexion_angle >= self.pushup.min_elbow_extension_angle {
            return Err(GradingError::InvalidConfig(
                "pushup.max_elbow_flexion_angle must be below min_elbow_extension_angle"
                    .to_string(),
            ));
        }

        if self.situp.min_trunk_angle > self.situp.max_trunk_angle
            || self.situp.min_knee_angle > self.situp.max_knee_angle
        {
            return Err(GradingError::InvalidConfig(
                "situp angle bands must have min <= max".to_string(),
            ));
        }

        let running = &self.running;
        if running.reference_distance_m <= 0.0
            || running.max_score_time_s >= running.passing_time_s
            || running.overage_window_s <= 0.0
        {
            return Err(GradingError::InvalidConfig(
                "running requires a positive distance, max_score_time_s < passing_time_s and a positive overage window"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

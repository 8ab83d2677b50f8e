use anyhow::{Context, Result};
use pt_grading::GradingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    /// Engine thresholds, passed through to every session
    #[serde(default)]
    pub grading: GradingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    /// Print a line for every rep, not just the summary
    #[serde(default = "default_true")]
    pub show_reps: bool,

    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_true(),
            show_reps: default_true(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.pt-grading/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".pt-grading"))
    }

    /// Get config file path (~/.pt-grading/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file(),
        }
    }

    /// Load configuration from file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_file = Self::resolve_path(path)?;

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file {}", config_file.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", config_file.display()))?;

        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config file")?;
        config.grading.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_file = Self::resolve_path(path)?;
        if let Some(config_dir) = config_file.parent() {
            fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.output.color);
        assert!(config.output.show_reps);
        assert_eq!(config.grading.rep_counter.state_stability_threshold, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [output]
            color = false

            [grading.pullup]
            normalize_swing_by_shoulder_width = true
            "#,
        )
        .unwrap();

        assert!(!config.output.color);
        assert!(config.output.show_reps);
        assert!(config.grading.pullup.normalize_swing_by_shoulder_width);
        assert_eq!(config.grading.pushup, GradingConfig::default().pushup);
    }

    #[test]
    fn test_invalid_grading_values_are_rejected() {
        let result = Config::from_toml_str(
            r#"
            [grading.rep_counter]
            state_stability_threshold = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.show_reps = false;
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert!(!loaded.output.show_reps);
        assert_eq!(loaded.grading, config.grading);
    }
}

//! Session configuration.
//!
//! ```rust
//! use hypercube_core::config::ModuleConfig;
//!
//! let config = ModuleConfig::default();
//! let replay = ModuleConfig::deterministic(7);
//! assert!(replay.validate().is_ok());
//! ```

use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::error::{HypercubeError, Result};

pub const CONFIG_PATH_ENV: &str = "HYPERCUBE_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Seeds target generation, initial facing and drift.
    pub seed: u64,
    /// Observer drift after IN/OUT/CLOCK/COUNTER presses.
    pub drift_enabled: bool,
    /// Start the observer on a random facing instead of front.
    pub randomize_initial_facing: bool,
    /// Longest press chain accepted from the command layer in one go.
    pub max_chained_presses: usize,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            drift_enabled: true,
            randomize_initial_facing: true,
            max_chained_presses: 5,
        }
    }
}

impl ModuleConfig {
    pub fn standard(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// No drift and a front-facing start. For replays and tests.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed,
            drift_enabled: false,
            randomize_initial_facing: false,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chained_presses == 0 {
            return Err(HypercubeError::Config(
                "max_chained_presses must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads a JSON config from `HYPERCUBE_CONFIG_PATH` when set, else the
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HypercubeError::Config(format!("Failed to read config file '{path}': {e}"))
        })?;
        let config = Self::from_json(&content).map_err(|e| {
            HypercubeError::Config(format!("Failed to parse config file '{path}': {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let standard = ModuleConfig::standard(9);
        assert_eq!(standard.seed, 9);
        assert!(standard.drift_enabled);

        let det = ModuleConfig::deterministic(9);
        assert!(!det.drift_enabled);
        assert!(!det.randomize_initial_facing);
        assert_eq!(det.max_chained_presses, 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ModuleConfig::from_json(r#"{"seed": 12, "drift_enabled": false}"#).unwrap();
        assert_eq!(config.seed, 12);
        assert!(!config.drift_enabled);
        assert!(config.randomize_initial_facing);
        assert_eq!(config.max_chained_presses, 5);
    }

    #[test]
    fn test_validate_rejects_zero_chain() {
        let config = ModuleConfig { max_chained_presses: 0, ..ModuleConfig::default() };
        assert!(matches!(config.validate(), Err(HypercubeError::Config(_))));
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = ModuleConfig::from_path("/nonexistent/hypercube.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

//! Configuration for the outlier detection engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunable parameters for window clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Maximum Euclidean distance for two readings to be neighbors
    pub epsilon: f64,

    /// Minimum neighbor count for a reading to anchor a dense region
    pub min_points: usize,

    /// Number of instants held in the sliding window
    pub window_capacity: usize,

    /// Redundant sensor channels sampled at each instant
    pub channels_per_instant: usize,

    /// Density passes per window; `None` runs one pass per point
    pub pass_count: Option<usize>,

    /// Seed for the visitation shuffle; `None` draws from entropy
    pub rng_seed: Option<u64>,

    /// Spacing between consecutive instants on the position axis;
    /// `None` derives 0.9 x epsilon
    pub position_stride: Option<f64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.5,
            min_points: 2,
            window_capacity: 4,
            channels_per_instant: 4,
            pass_count: None,
            rng_seed: None,
            position_stride: None,
        }
    }
}

impl DetectorConfig {
    /// Check every parameter eagerly.
    ///
    /// Invalid parameters are fatal at construction time; nothing is left
    /// to be discovered mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidParameter(
                "epsilon must be a positive finite number".to_string(),
            ));
        }
        if self.min_points < 1 {
            return Err(ConfigError::InvalidParameter(
                "min_points must be at least 1".to_string(),
            ));
        }
        if self.window_capacity < 1 {
            return Err(ConfigError::InvalidParameter(
                "window_capacity must be at least 1".to_string(),
            ));
        }
        if self.channels_per_instant < 1 {
            return Err(ConfigError::InvalidParameter(
                "channels_per_instant must be at least 1".to_string(),
            ));
        }
        if let Some(passes) = self.pass_count {
            if passes < 1 {
                return Err(ConfigError::InvalidParameter(
                    "pass_count must be at least 1 when set".to_string(),
                ));
            }
        }
        if let Some(stride) = self.position_stride {
            if !stride.is_finite() || stride <= 0.0 {
                return Err(ConfigError::InvalidParameter(
                    "position_stride must be a positive finite number when set".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Spacing between consecutive instants on the position axis.
    ///
    /// Defaults to 0.9 x epsilon so adjacent instants sit just inside the
    /// neighbor radius.
    pub fn stride(&self) -> f64 {
        self.position_stride.unwrap_or(self.epsilon * 0.9)
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: DetectorConfig = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sensor-quorum")
            .join("config.json")
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    InvalidParameter(String),
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter(e) => write!(f, "Invalid parameter: {e}"),
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

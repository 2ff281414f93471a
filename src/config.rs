//! Configuration loading.
//!
//! Settings come from `mender.toml`, looked up in the working directory and
//! then the user config directory. Every field has a serde default, so an
//! absent file or an empty file both yield the stock configuration; only a
//! file that exists but fails to parse or validate is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::AnalyticsConfig;
use crate::error::{MenderError, Result};
use crate::explain::DEFAULT_CACHE_CAPACITY;
use crate::learning::LearningConfig;

/// Configuration filename searched for in config locations.
pub const CONFIG_FILENAME: &str = "mender.toml";

// ============================================================================
// Sections
// ============================================================================

/// Explanation cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    pub cache_capacity: usize,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Durable storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".mender"),
        }
    }
}

// ============================================================================
// Top level
// ============================================================================

/// The full runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenderConfig {
    pub learning: LearningConfig,
    pub analytics: AnalyticsConfig,
    pub explain: ExplainConfig,
    pub storage: StorageConfig,
}

impl MenderConfig {
    /// Load configuration, searching standard locations.
    ///
    /// With an explicit `path` the file must exist and parse. Otherwise the
    /// working directory is tried first, then the user config directory;
    /// when neither holds a file the defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_file(path);
        }

        let local = PathBuf::from(CONFIG_FILENAME);
        if local.exists() {
            return Self::load_file(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("mender").join(CONFIG_FILENAME);
            if user.exists() {
                return Self::load_file(&user);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MenderError::config_with_path(format!("failed to read: {}", e), path.to_path_buf())
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            MenderError::config_with_path(format!("failed to parse: {}", e), path.to_path_buf())
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check field ranges, naming the offending field on failure.
    pub fn validate(&self) -> Result<()> {
        let unit = |field: &str, value: f64| -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(MenderError::InvalidConfig {
                    field: field.to_string(),
                    reason: format!("must be within 0.0..=1.0, got {}", value),
                })
            }
        };

        unit("learning.success_delta", self.learning.success_delta)?;
        unit("learning.failure_delta", self.learning.failure_delta)?;
        unit(
            "learning.seed_success_confidence",
            self.learning.seed_success_confidence,
        )?;
        unit(
            "learning.seed_failure_confidence",
            self.learning.seed_failure_confidence,
        )?;
        unit("learning.confidence_floor", self.learning.confidence_floor)?;
        unit(
            "analytics.recommendation_threshold",
            self.analytics.recommendation_threshold,
        )?;

        if self.learning.example_window == 0 {
            return Err(MenderError::InvalidConfig {
                field: "learning.example_window".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.analytics.anomaly_factor <= 1.0 {
            return Err(MenderError::InvalidConfig {
                field: "analytics.anomaly_factor".to_string(),
                reason: format!("must exceed 1.0, got {}", self.analytics.anomaly_factor),
            });
        }
        if self.explain.cache_capacity == 0 {
            return Err(MenderError::InvalidConfig {
                field: "explain.cache_capacity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = MenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning.example_window, 10);
        assert_eq!(config.explain.cache_capacity, 256);
        assert_eq!(config.storage.data_dir, PathBuf::from(".mender"));
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let config = MenderConfig::load(Some(&path)).expect("load");
        assert_eq!(config.learning.example_cap, 1000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[learning]\nsuccess_delta = 0.2\n\n[explain]\ncache_capacity = 16\n",
        )
        .unwrap();

        let config = MenderConfig::load(Some(&path)).expect("load");
        assert_eq!(config.learning.success_delta, 0.2);
        assert_eq!(config.learning.failure_delta, 0.10);
        assert_eq!(config.explain.cache_capacity, 16);
        assert_eq!(config.analytics.insight_cap, 10);
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let err = MenderConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, MenderError::Config { .. }));
    }

    #[test]
    fn test_malformed_toml_is_error_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[learning\nbroken").unwrap();

        let err = MenderConfig::load(Some(&path)).unwrap_err();
        match err {
            MenderError::Config { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_names_the_field() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[learning]\nsuccess_delta = 1.5\n").unwrap();

        let err = MenderConfig::load(Some(&path)).unwrap_err();
        match err {
            MenderError::InvalidConfig { field, .. } => {
                assert_eq!(field, "learning.success_delta")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_example_window_rejected() {
        let mut config = MenderConfig::default();
        config.learning.example_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_anomaly_factor_must_exceed_one() {
        let mut config = MenderConfig::default();
        config.analytics.anomaly_factor = 1.0;
        assert!(config.validate().is_err());
    }
}

//! Application configuration
//!
//! Aggregates every component's settings so a run can be described by a
//! single JSON file. Missing sections fall back to their defaults.

use crate::error::{Result, ValuationError};
use crate::inference::InferenceConfig;
use crate::preprocessing::CleaningConfig;
use crate::training::TrainingConfig;
use crate::utils::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnMapping,
    pub cleaning: CleaningConfig,
    pub training: TrainingConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| ValuationError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.training.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::new();
        config.training = config.training.with_degree(3);
        config.columns = ColumnMapping::attribute_keys();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "training": { "degree": 2 } }"#).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.training.degree, 2);
        assert_eq!(loaded.training.random_seed, 42);
        assert_eq!(loaded.inference.max_floor_area, 250.0);
        assert_eq!(loaded.columns.price, "resale_price");
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "training": { "degree": "four" } }"#).unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ValuationError::ConfigError(_))));
    }
}

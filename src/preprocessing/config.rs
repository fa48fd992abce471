//! Cleaning configuration

use serde::{Deserialize, Serialize};

/// Configuration for the record cleaning pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Drop exact duplicate records
    pub drop_duplicates: bool,

    /// Drop records with any missing attribute or price
    pub drop_missing: bool,

    /// Lower price quantile kept (0.005 keeps everything above the 0.5th percentile)
    pub price_lower_quantile: Option<f64>,

    /// Upper price quantile kept
    pub price_upper_quantile: Option<f64>,

    /// Minimum floor area in square metres
    pub min_floor_area: Option<f64>,

    /// Maximum floor area in square metres
    pub max_floor_area: Option<f64>,

    /// Trim and upper-case categorical values
    pub normalize_categories: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
            drop_missing: true,
            price_lower_quantile: Some(0.005),
            price_upper_quantile: Some(0.995),
            min_floor_area: Some(30.0),
            max_floor_area: Some(250.0),
            normalize_categories: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that only drops incomplete records
    pub fn minimal() -> Self {
        Self {
            drop_duplicates: false,
            drop_missing: true,
            price_lower_quantile: None,
            price_upper_quantile: None,
            min_floor_area: None,
            max_floor_area: None,
            normalize_categories: false,
        }
    }

    /// Builder method to set the kept price quantile band
    pub fn with_price_quantiles(mut self, lower: f64, upper: f64) -> Self {
        self.price_lower_quantile = Some(lower);
        self.price_upper_quantile = Some(upper);
        self
    }

    /// Builder method to disable price trimming
    pub fn without_price_trim(mut self) -> Self {
        self.price_lower_quantile = None;
        self.price_upper_quantile = None;
        self
    }

    /// Builder method to set the floor area bounds
    pub fn with_floor_area_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_floor_area = Some(min);
        self.max_floor_area = Some(max);
        self
    }

    /// Builder method to toggle duplicate removal
    pub fn with_drop_duplicates(mut self, enabled: bool) -> Self {
        self.drop_duplicates = enabled;
        self
    }
}

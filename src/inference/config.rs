//! Inference configuration

use serde::{Deserialize, Serialize};

/// Configuration for prediction and market analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Smallest accepted floor area in square metres
    pub min_floor_area: f64,

    /// Largest accepted floor area in square metres
    pub max_floor_area: f64,

    /// Smallest accepted remaining lease in years
    pub min_remaining_lease: f64,

    /// Largest accepted remaining lease in years
    pub max_remaining_lease: f64,

    /// Multiplier applied to raw feature values for contribution scores
    pub contribution_scale: f64,

    /// Relative price band for comparable combinations (0.05 = ±5%)
    pub comparable_band: f64,

    /// Nearest combinations returned when none fall inside the band
    pub fallback_comparables: usize,

    /// Regions shown in the price matrix
    pub max_matrix_regions: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_floor_area: 30.0,
            max_floor_area: 250.0,
            min_remaining_lease: 40.0,
            max_remaining_lease: 99.0,
            contribution_scale: 10_000.0,
            comparable_band: 0.05,
            fallback_comparables: 10,
            max_matrix_regions: 12,
        }
    }
}

impl InferenceConfig {
    /// Create a new inference configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the accepted floor area range
    pub fn with_floor_area_range(mut self, min: f64, max: f64) -> Self {
        self.min_floor_area = min;
        self.max_floor_area = max;
        self
    }

    /// Builder method to set the accepted remaining lease range
    pub fn with_remaining_lease_range(mut self, min: f64, max: f64) -> Self {
        self.min_remaining_lease = min;
        self.max_remaining_lease = max;
        self
    }

    /// Builder method to set the contribution multiplier
    pub fn with_contribution_scale(mut self, scale: f64) -> Self {
        self.contribution_scale = scale;
        self
    }

    /// Builder method to set the comparable price band
    pub fn with_comparable_band(mut self, band: f64) -> Self {
        self.comparable_band = band;
        self
    }

    /// Builder method to set the price matrix region limit
    pub fn with_max_matrix_regions(mut self, n: usize) -> Self {
        self.max_matrix_regions = n;
        self
    }
}

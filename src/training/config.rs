//! Training configuration

use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};

/// Configuration for model training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Polynomial expansion degree
    pub degree: usize,

    /// Fraction of rows held out for testing
    pub test_size: f64,

    /// Seed for the train/test shuffle
    pub random_seed: u64,

    /// Relative singular value cutoff for the least squares solve
    pub rcond: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            degree: 4,
            test_size: 0.2,
            random_seed: 42,
            rcond: 1e-10,
        }
    }
}

impl TrainingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the polynomial degree
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set random seed
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Builder method to set the singular value cutoff
    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.rcond = rcond;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.degree == 0 {
            return Err(ValuationError::InvalidParameter {
                name: "degree".to_string(),
                value: self.degree.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ValuationError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must be strictly between 0 and 1".to_string(),
            });
        }
        if !(self.rcond >= 0.0 && self.rcond.is_finite()) {
            return Err(ValuationError::InvalidParameter {
                name: "rcond".to_string(),
                value: self.rcond.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

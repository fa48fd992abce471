//! Regression metrics and training summary

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics for model evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Mean Squared Error
    pub mse: Option<f64>,
    /// Root Mean Squared Error
    pub rmse: Option<f64>,
    /// Mean Absolute Error
    pub mae: Option<f64>,
    /// R-squared
    pub r2: Option<f64>,
    /// Number of evaluated samples
    pub n_samples: usize,
}

impl ModelMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute regression metrics
    ///
    /// R² is reported as `0.0` when the targets have no variance.
    pub fn compute_regression(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mut metrics = Self::new();
        metrics.n_samples = y_true.len();
        if y_true.is_empty() {
            return metrics;
        }

        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse: f64 = errors.iter().map(|e| e * e).sum::<f64>() / n;
        metrics.mse = Some(mse);
        metrics.rmse = Some(mse.sqrt());

        let mae: f64 = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
        metrics.mae = Some(mae);

        let y_mean: f64 = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();

        metrics.r2 = if ss_tot > 0.0 {
            Some(1.0 - ss_res / ss_tot)
        } else {
            Some(0.0)
        };

        metrics
    }
}

/// Outcome of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Polynomial degree
    pub degree: usize,
    pub train_sample_count: usize,
    pub test_sample_count: usize,
    /// Features before expansion
    pub raw_feature_count: usize,
    /// Polynomial terms the linear model is fitted over
    pub expanded_feature_count: usize,
    /// Numerical rank of the expanded training matrix
    pub effective_rank: usize,
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_mae: f64,
    pub test_rmse: f64,
    /// Lowest price seen in the training partition
    pub price_min: f64,
    /// Highest price seen in the training partition
    pub price_max: f64,
    pub training_time_secs: f64,
}

impl TrainingSummary {
    /// Test R² as a percentage
    pub fn accuracy_percent(&self) -> f64 {
        self.test_r2 * 100.0
    }
}

//! Feature standardization

use crate::error::{Result, ValuationError};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Standard deviations at or below this are treated as zero
const ZERO_VARIANCE_EPS: f64 = 1e-12;

/// Parameters for one fitted column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub center: f64,
    pub scale: f64,
}

/// Z-score scaler using the population standard deviation.
///
/// A constant column keeps `scale = 1.0`, so it standardizes to all zeros
/// instead of dividing by zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column mean and standard deviation
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(ValuationError::EmptyDataset);
        }

        self.params = x
            .axis_iter(Axis(1))
            .map(Self::column_params)
            .collect();
        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotTrained);
        }
        if x.ncols() != self.params.len() {
            return Err(ValuationError::ShapeError {
                expected: format!("{} columns", self.params.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut out = x.clone();
        for (mut col, p) in out.axis_iter_mut(Axis(1)).zip(&self.params) {
            col.mapv_inplace(|v| (v - p.center) / p.scale);
        }
        Ok(out)
    }

    /// Standardize a single row in place
    pub fn transform_row(&self, row: &mut [f64]) -> Result<()> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotTrained);
        }
        if row.len() != self.params.len() {
            return Err(ValuationError::ShapeError {
                expected: format!("{} features", self.params.len()),
                actual: format!("{} features", row.len()),
            });
        }
        for (v, p) in row.iter_mut().zip(&self.params) {
            *v = (*v - p.center) / p.scale;
        }
        Ok(())
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn params(&self) -> &[ScalerParams] {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn column_params(col: ArrayView1<f64>) -> ScalerParams {
        let n = col.len() as f64;
        let mean = col.sum() / n;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        ScalerParams {
            center: mean,
            scale: if std <= ZERO_VARIANCE_EPS || !std.is_finite() { 1.0 } else { std },
        }
    }
}

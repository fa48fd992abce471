//! Linear model implementations
//!
//! [`LinearRegression`] solves ordinary least squares through an SVD of the
//! centered design matrix, which yields the minimum-norm solution when the
//! columns are collinear. High-degree polynomial bases over small integer
//! codes are collinear by construction, so normal equations are not used.
//!
//! [`PolynomialRegression`] chains standardization, polynomial expansion and
//! the OLS fit into one estimator.

use super::models::ModelMetrics;
use crate::error::{Result, ValuationError};
use crate::feature_engineering::{FeatureTransformer, PolynomialFeatures};
use crate::preprocessing::StandardScaler;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default relative cutoff for singular values
pub const DEFAULT_RCOND: f64 = 1e-10;

/// Minimum-norm least squares solution of `x * beta = y`.
///
/// Singular values at or below `rcond * sigma_max` are treated as zero.
/// Returns the solution and the numerical rank of `x`.
pub fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>, rcond: f64) -> Result<(Array1<f64>, usize)> {
    let (n, m) = x.dim();
    if n != y.len() {
        return Err(ValuationError::ShapeError {
            expected: format!("y length = {}", n),
            actual: format!("y length = {}", y.len()),
        });
    }

    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ValuationError::DataError(
            "least squares input contains NaN or infinite values".to_string(),
        ));
    }

    let a = DMatrix::from_fn(n, m, |r, c| x[[r, c]]);
    let b = DVector::from_iterator(n, y.iter().copied());

    let svd = a.svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0f64, f64::max);
    let tol = rcond * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();

    let beta = svd
        .solve(&b, tol)
        .map_err(|e| ValuationError::ComputationError(format!("least squares solve failed: {}", e)))?;

    if beta.iter().any(|v| !v.is_finite()) {
        return Err(ValuationError::ComputationError(
            "least squares produced non-finite coefficients".to_string(),
        ));
    }

    Ok((Array1::from_iter(beta.iter().copied()), rank))
}

/// Ordinary least squares linear regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Relative singular value cutoff
    pub rcond: f64,
    /// Numerical rank of the (centered) design matrix
    pub rank: Option<usize>,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            rcond: DEFAULT_RCOND,
            rank: None,
            is_fitted: false,
        }
    }

    /// Set the relative singular value cutoff
    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.rcond = rcond;
        self
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(ValuationError::EmptyDataset);
        }
        if n_samples != y.len() {
            return Err(ValuationError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        // Centering absorbs the intercept
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or(ValuationError::EmptyDataset)?;
        let y_mean = y.mean().unwrap_or(0.0);

        let x_centered = x - &x_mean.view().insert_axis(Axis(0));
        let y_centered = y - y_mean;

        let (coefficients, rank) = solve_least_squares(&x_centered, &y_centered, self.rcond)?;
        let intercept = y_mean - coefficients.dot(&x_mean);

        debug!(n_samples, n_features = x.ncols(), rank, "Fitted least squares");

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.rank = Some(rank);
        self.is_fitted = true;
        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coef = self.fitted_coefficients(x.ncols())?;
        Ok(x.dot(coef) + self.intercept.unwrap_or(0.0))
    }

    /// Predict a single row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let coef = self.fitted_coefficients(row.len())?;
        let sum: f64 = coef.iter().zip(row).map(|(c, v)| c * v).sum();
        Ok(sum + self.intercept.unwrap_or(0.0))
    }

    fn fitted_coefficients(&self, n_cols: usize) -> Result<&Array1<f64>> {
        let coef = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(ValuationError::ModelNotTrained),
        };
        if coef.len() != n_cols {
            return Err(ValuationError::ShapeError {
                expected: format!("{} features", coef.len()),
                actual: format!("{} features", n_cols),
            });
        }
        Ok(coef)
    }
}

/// Standardize, expand to polynomial terms, then fit OLS with intercept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialRegression {
    pub degree: usize,
    scaler: StandardScaler,
    poly: PolynomialFeatures,
    inner: LinearRegression,
    pub is_fitted: bool,
    n_original_features: usize,
}

impl PolynomialRegression {
    pub fn new(degree: usize) -> Self {
        let degree = degree.max(1);
        Self {
            degree,
            scaler: StandardScaler::new(),
            poly: PolynomialFeatures::new(degree),
            inner: LinearRegression::new(),
            is_fitted: false,
            n_original_features: 0,
        }
    }

    /// Name the input features so expanded terms get readable names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.poly = self.poly.with_feature_names(names);
        self
    }

    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.inner = self.inner.with_rcond(rcond);
        self
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(ValuationError::EmptyDataset);
        }
        self.n_original_features = x.ncols();

        let x_scaled = self.scaler.fit_transform(x)?;
        let x_poly = self.poly.fit_transform(&x_scaled)?;
        self.inner.fit(&x_poly, y)?;

        self.is_fitted = true;
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotTrained);
        }
        let x_scaled = self.scaler.transform(x)?;
        let x_poly = self.poly.transform(&x_scaled)?;
        self.inner.predict(&x_poly)
    }

    /// Predict a single feature row
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotTrained);
        }
        let mut row = features.to_vec();
        self.scaler.transform_row(&mut row)?;
        let expanded = self.poly.transform_row(&row)?;
        self.inner.predict_row(&expanded)
    }

    /// Coefficient of determination on `(x, y)`
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let preds = self.predict(x)?;
        Ok(ModelMetrics::compute_regression(y, &preds).r2.unwrap_or(0.0))
    }

    pub fn n_original_features(&self) -> usize {
        self.n_original_features
    }

    /// Number of polynomial terms the linear model is fitted over
    pub fn n_expanded_features(&self) -> usize {
        self.poly.n_output_features()
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.inner.coefficients.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.inner.intercept
    }

    /// Numerical rank of the expanded design matrix
    pub fn effective_rank(&self) -> Option<usize> {
        self.inner.rank
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}

//! Feature engineering module
//!
//! Polynomial basis expansion for the regression engine.

mod polynomial;

pub use polynomial::{polynomial_term_count, PolynomialConfig, PolynomialFeatures};

use crate::error::Result;
use ndarray::Array2;

/// A column transform that learns its input width on `fit`
pub trait FeatureTransformer: Send + Sync {
    /// Record the input shape
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Map `n x d` input to the expanded columns
    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Output column names, in column order
    fn get_feature_names(&self) -> Vec<String>;
}

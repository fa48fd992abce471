//! Polynomial feature generation
//!
//! Terms are produced degree by degree; within a degree they are the
//! combinations-with-replacement of feature indices in lexicographic order.
//! For features `[a, b]` and degree 2 that gives `a, b, a^2, a * b, b^2`.

use crate::error::{Result, ValuationError};
use crate::feature_engineering::FeatureTransformer;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Configuration for polynomial features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialConfig {
    /// Maximum polynomial degree
    pub degree: usize,
    /// Include bias term (constant 1)
    pub include_bias: bool,
}

impl Default for PolynomialConfig {
    fn default() -> Self {
        Self {
            degree: 2,
            include_bias: false,
        }
    }
}

/// Number of terms of degree `1..=degree` over `n_features` inputs, no bias.
///
/// Equals `C(n_features + degree, degree) - 1`.
pub fn polynomial_term_count(n_features: usize, degree: usize) -> usize {
    // C(n + d, d) built incrementally; every partial product is itself a binomial
    let mut count = 1usize;
    for k in 1..=degree {
        count = count * (n_features + k) / k;
    }
    count - 1
}

/// Polynomial feature generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    config: PolynomialConfig,
    n_features_in: Option<usize>,
    feature_names: Option<Vec<String>>,
    combinations: Option<Vec<Vec<usize>>>,
}

impl PolynomialFeatures {
    /// Create new polynomial feature generator
    pub fn new(degree: usize) -> Self {
        Self {
            config: PolynomialConfig {
                degree: degree.max(1),
                ..Default::default()
            },
            n_features_in: None,
            feature_names: None,
            combinations: None,
        }
    }

    /// Include bias term
    pub fn with_bias(mut self, include: bool) -> Self {
        self.config.include_bias = include;
        self
    }

    /// Set input feature names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn degree(&self) -> usize {
        self.config.degree
    }

    pub fn n_features_in(&self) -> Option<usize> {
        self.n_features_in
    }

    /// Number of output columns, zero before fitting
    pub fn n_output_features(&self) -> usize {
        self.combinations.as_ref().map_or(0, Vec::len)
    }

    /// Expand a single row
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        let combinations = self.fitted_combinations(row.len())?;
        Ok(combinations
            .iter()
            .map(|combo| Self::compute_combination(row, combo))
            .collect())
    }

    fn fitted_combinations(&self, n_cols: usize) -> Result<&[Vec<usize>]> {
        let combinations = self.combinations.as_ref().ok_or(ValuationError::ModelNotTrained)?;
        let expected = self.n_features_in.unwrap_or(0);
        if n_cols != expected {
            return Err(ValuationError::ShapeError {
                expected: format!("{} features", expected),
                actual: format!("{} features", n_cols),
            });
        }
        Ok(combinations)
    }

    fn generate_combinations(&self, n_features: usize) -> Vec<Vec<usize>> {
        let mut combinations = Vec::new();

        if self.config.include_bias {
            combinations.push(Vec::new());
        }

        for d in 1..=self.config.degree {
            Self::generate_combinations_recursive(n_features, d, 0, &mut Vec::new(), &mut combinations);
        }

        combinations
    }

    fn generate_combinations_recursive(
        n_features: usize,
        remaining_degree: usize,
        start_idx: usize,
        current: &mut Vec<usize>,
        result: &mut Vec<Vec<usize>>,
    ) {
        if remaining_degree == 0 {
            result.push(current.clone());
            return;
        }

        for i in start_idx..n_features {
            current.push(i);
            // same index allowed again for powers
            Self::generate_combinations_recursive(n_features, remaining_degree - 1, i, current, result);
            current.pop();
        }
    }

    fn compute_combination(row: &[f64], combination: &[usize]) -> f64 {
        combination.iter().map(|&i| row[i]).product()
    }

    fn combination_name(&self, combination: &[usize]) -> String {
        if combination.is_empty() {
            return "1".to_string();
        }

        // combinations are non-decreasing, so equal indices are adjacent
        let mut parts: Vec<String> = Vec::new();
        let mut i = 0;
        while i < combination.len() {
            let idx = combination[i];
            let run = combination[i..].iter().take_while(|&&c| c == idx).count();
            let name = self
                .feature_names
                .as_ref()
                .and_then(|n| n.get(idx).cloned())
                .unwrap_or_else(|| format!("x{}", idx));
            parts.push(if run == 1 { name } else { format!("{}^{}", name, run) });
            i += run;
        }

        parts.join(" * ")
    }
}

impl Default for PolynomialFeatures {
    fn default() -> Self {
        Self::new(2)
    }
}

impl FeatureTransformer for PolynomialFeatures {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        self.n_features_in = Some(x.ncols());
        self.combinations = Some(self.generate_combinations(x.ncols()));
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let combinations = self.fitted_combinations(x.ncols())?;

        let mut result = Array2::zeros((x.nrows(), combinations.len()));
        for (row, mut out) in x.rows().into_iter().zip(result.rows_mut()) {
            let row_vec: Vec<f64> = row.iter().copied().collect();
            for (slot, combo) in out.iter_mut().zip(combinations) {
                *slot = Self::compute_combination(&row_vec, combo);
            }
        }

        Ok(result)
    }

    fn get_feature_names(&self) -> Vec<String> {
        self.combinations
            .as_ref()
            .map(|combos| combos.iter().map(|c| self.combination_name(c)).collect())
            .unwrap_or_default()
    }
}

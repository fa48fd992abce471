//! Training engine implementation

use super::linear_models::PolynomialRegression;
use super::{ModelMetrics, TrainingConfig, TrainingSummary};
use crate::error::{Result, ValuationError};
use crate::inference::{InferenceConfig, PriceEstimator};
use crate::preprocessing::{DataCleaner, FeatureBuilder, HousingRecord, FEATURE_ORDER, N_FEATURES};
use crate::utils::{records_from_dataframe, ColumnMapping};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::DataFrame;
use rand::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// Main training engine
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
    features: Option<FeatureBuilder>,
    model: Option<PolynomialRegression>,
    summary: Option<TrainingSummary>,
    is_fitted: bool,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            features: None,
            model: None,
            summary: None,
            is_fitted: false,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Convert a table to records, optionally clean them, then fit
    pub fn fit_dataframe(
        &mut self,
        df: &DataFrame,
        mapping: &ColumnMapping,
        cleaner: Option<&DataCleaner>,
    ) -> Result<&mut Self> {
        if df.height() == 0 {
            return Err(ValuationError::EmptyDataset);
        }
        let records = records_from_dataframe(df, mapping)?;
        let records = match cleaner {
            Some(cleaner) => cleaner.clean(records).0,
            None => records,
        };
        self.fit(&records)
    }

    /// Fit the encoder and the regression model on labelled records
    pub fn fit(&mut self, records: &[HousingRecord]) -> Result<&mut Self> {
        self.config.validate()?;
        let start = Instant::now();

        if records.is_empty() {
            return Err(ValuationError::EmptyDataset);
        }

        let labelled: Vec<HousingRecord> = records.iter().filter(|r| r.price.is_some()).cloned().collect();
        let skipped = records.len() - labelled.len();
        if skipped > 0 {
            warn!(skipped, "Skipping records without a price");
        }
        if labelled.is_empty() {
            return Err(ValuationError::EmptyDataset);
        }

        let features = FeatureBuilder::fit(&labelled)?;
        let x = features.build_matrix(&labelled)?;
        let y: Array1<f64> = labelled.iter().filter_map(|r| r.price).collect();
        check_finite(&x, &y)?;

        let (x_train, x_test, y_train, y_test) = self.train_test_split(&x, &y)?;

        let mut model = PolynomialRegression::new(self.config.degree)
            .with_feature_names(features.feature_names())
            .with_rcond(self.config.rcond);
        model.fit(&x_train, &y_train)?;

        let train_metrics = ModelMetrics::compute_regression(&y_train, &model.predict(&x_train)?);
        let test_metrics = ModelMetrics::compute_regression(&y_test, &model.predict(&x_test)?);

        let expanded = model.n_expanded_features();
        let rank = model.effective_rank().unwrap_or(0);
        if rank < expanded {
            warn!(rank, expanded, "Expanded design matrix is rank deficient, using minimum-norm solution");
        }

        let summary = TrainingSummary {
            degree: self.config.degree,
            train_sample_count: x_train.nrows(),
            test_sample_count: x_test.nrows(),
            raw_feature_count: N_FEATURES,
            expanded_feature_count: expanded,
            effective_rank: rank,
            train_r2: train_metrics.r2.unwrap_or(0.0),
            test_r2: test_metrics.r2.unwrap_or(0.0),
            test_mae: test_metrics.mae.unwrap_or(0.0),
            test_rmse: test_metrics.rmse.unwrap_or(0.0),
            price_min: y_train.iter().copied().fold(f64::INFINITY, f64::min),
            price_max: y_train.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            training_time_secs: start.elapsed().as_secs_f64(),
        };

        info!(
            degree = summary.degree,
            train = summary.train_sample_count,
            test = summary.test_sample_count,
            terms = summary.expanded_feature_count,
            train_r2 = summary.train_r2,
            test_r2 = summary.test_r2,
            test_mae = summary.test_mae,
            "Training complete"
        );

        self.features = Some(features);
        self.model = Some(model);
        self.summary = Some(summary);
        self.is_fitted = true;
        Ok(self)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Summary of the last successful fit
    pub fn summary(&self) -> Option<&TrainingSummary> {
        self.summary.as_ref()
    }

    pub fn model(&self) -> Option<&PolynomialRegression> {
        self.model.as_ref()
    }

    pub fn feature_builder(&self) -> Option<&FeatureBuilder> {
        self.features.as_ref()
    }

    /// Hand the fitted pipeline to a prediction service
    pub fn into_estimator(self, config: InferenceConfig) -> Result<PriceEstimator> {
        match (self.features, self.model, self.summary) {
            (Some(features), Some(model), Some(summary)) if self.is_fitted => {
                Ok(PriceEstimator::new(features, model, summary, config))
            }
            _ => Err(ValuationError::ModelNotTrained),
        }
    }

    /// Seeded shuffle, then hold out `ceil(n * test_size)` rows
    fn train_test_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>)> {
        let n = x.nrows();
        let n_test = (n as f64 * self.config.test_size).ceil() as usize;
        if n_test == 0 || n_test >= n {
            return Err(ValuationError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.config.test_size.to_string(),
                reason: format!("leaves an empty partition for {} rows", n),
            });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.random_seed);
        indices.shuffle(&mut rng);
        let (test_idx, train_idx) = indices.split_at(n_test);

        Ok((
            x.select(Axis(0), train_idx),
            x.select(Axis(0), test_idx),
            y.select(Axis(0), train_idx),
            y.select(Axis(0), test_idx),
        ))
    }
}

/// Reject NaN or infinite inputs before they reach the solver
fn check_finite(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    for (i, (row, price)) in x.rows().into_iter().zip(y.iter()).enumerate() {
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(ValuationError::DataError(format!(
                "record {} has a non-finite {} ({})",
                i,
                FEATURE_ORDER[j].key(),
                row[j]
            )));
        }
        if !price.is_finite() {
            return Err(ValuationError::DataError(format!(
                "record {} has a non-finite price ({})",
                i, price
            )));
        }
    }
    Ok(())
}

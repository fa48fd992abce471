//! Prediction service
//!
//! [`PriceEstimator`] owns the fitted encoder and regression model. It is
//! immutable after construction and every prediction borrows it read-only.

use super::contributions::{find_contribution, heuristic_contributions, Contribution};
use super::InferenceConfig;
use crate::error::{Result, ValuationError};
use crate::preprocessing::{Attribute, FeatureBuilder, PropertyAttributes, CATEGORICAL_ATTRIBUTES};
use crate::training::{PolynomialRegression, TrainingSummary};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Price estimate with per-feature display scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub price: f64,
    pub contributions: Vec<Contribution>,
}

impl Prediction {
    /// Score for a feature label such as `"Floor Area Sqm"`
    pub fn contribution(&self, feature: &str) -> Option<f64> {
        find_contribution(&self.contributions, feature).map(|c| c.score)
    }
}

/// Validates requests and scores them with the trained model
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    features: FeatureBuilder,
    model: PolynomialRegression,
    summary: TrainingSummary,
    config: InferenceConfig,
}

impl PriceEstimator {
    pub fn new(
        features: FeatureBuilder,
        model: PolynomialRegression,
        summary: TrainingSummary,
        config: InferenceConfig,
    ) -> Self {
        Self {
            features,
            model,
            summary,
            config,
        }
    }

    /// Check presence, vocabulary membership and numeric ranges
    pub fn validate(&self, request: &PropertyAttributes) -> Result<()> {
        if let Some(missing) = request.first_missing() {
            return Err(ValuationError::MissingAttribute(missing.key().to_string()));
        }

        for &attribute in &CATEGORICAL_ATTRIBUTES {
            if let Some(value) = request.category(attribute) {
                self.features.encoder().encode(attribute, value)?;
            }
        }

        let ranges = [
            (Attribute::FloorAreaSqm, self.config.min_floor_area, self.config.max_floor_area),
            (
                Attribute::RemainingLease,
                self.config.min_remaining_lease,
                self.config.max_remaining_lease,
            ),
        ];
        for (attribute, min, max) in ranges {
            if let Some(value) = request.numeric(attribute) {
                if !(value >= min && value <= max) {
                    return Err(ValuationError::OutOfRange {
                        attribute: attribute.key().to_string(),
                        value,
                        min,
                        max,
                    });
                }
            }
        }

        Ok(())
    }

    /// Validate, then estimate the resale price
    pub fn predict(&self, request: &PropertyAttributes) -> Result<Prediction> {
        self.validate(request)?;

        let features = self.features.build(request)?;
        let price = self.model.predict_one(features.as_slice())?;
        if !price.is_finite() {
            return Err(ValuationError::ComputationError(
                "model produced a non-finite price".to_string(),
            ));
        }

        debug!(price, "Predicted resale price");
        Ok(Prediction {
            price,
            contributions: heuristic_contributions(&features, self.config.contribution_scale),
        })
    }

    /// Predict each request independently
    pub fn predict_batch(&self, requests: &[PropertyAttributes]) -> Vec<Result<Prediction>> {
        requests.iter().map(|r| self.predict(r)).collect()
    }

    /// Sorted valid values for a categorical attribute
    pub fn vocabulary(&self, attribute: Attribute) -> Result<&[String]> {
        Ok(self.features.encoder().vocabulary(attribute)?.values())
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn feature_builder(&self) -> &FeatureBuilder {
        &self.features
    }

    pub fn model(&self) -> &PolynomialRegression {
        &self.model
    }
}

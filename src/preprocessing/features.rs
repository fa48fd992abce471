//! Feature vector construction
//!
//! The same [`FeatureBuilder::build`] call produces training rows and live
//! prediction inputs, so the two paths cannot drift apart.

use super::encoder::CategoryEncoder;
use super::record::{Attribute, HousingRecord, PropertyAttributes, FEATURE_ORDER, N_FEATURES};
use crate::error::{Result, ValuationError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Fixed-width numeric features in [`FEATURE_ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of one attribute's feature
    pub fn get(&self, attribute: Attribute) -> f64 {
        self.0[attribute.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        FEATURE_ORDER.iter().copied().zip(self.0.iter().copied())
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.0.to_vec())
    }
}

/// Turns raw attributes into feature vectors using a fitted encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBuilder {
    encoder: CategoryEncoder,
}

impl FeatureBuilder {
    pub fn new(encoder: CategoryEncoder) -> Self {
        Self { encoder }
    }

    /// Fit the encoder on `records` and wrap it
    pub fn fit(records: &[HousingRecord]) -> Result<Self> {
        Ok(Self::new(CategoryEncoder::fit(records)?))
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    /// Feature names in column order
    pub fn feature_names(&self) -> Vec<String> {
        FEATURE_ORDER.iter().map(|a| a.key().to_string()).collect()
    }

    /// Encode one record
    pub fn build(&self, attrs: &PropertyAttributes) -> Result<FeatureVector> {
        let mut values = [0.0; N_FEATURES];
        for (slot, &attribute) in values.iter_mut().zip(FEATURE_ORDER.iter()) {
            *slot = if attribute.is_categorical() {
                let raw = attrs
                    .category(attribute)
                    .ok_or_else(|| ValuationError::MissingAttribute(attribute.key().to_string()))?;
                self.encoder.encode(attribute, raw)? as f64
            } else {
                attrs
                    .numeric(attribute)
                    .ok_or_else(|| ValuationError::MissingAttribute(attribute.key().to_string()))?
            };
        }
        Ok(FeatureVector(values))
    }

    /// Stack the feature vectors of `records` into an `n x 6` matrix
    pub fn build_matrix(&self, records: &[HousingRecord]) -> Result<Array2<f64>> {
        let mut x = Array2::zeros((records.len(), N_FEATURES));
        for (mut row, record) in x.rows_mut().into_iter().zip(records) {
            let features = self.build(&record.attributes)?;
            row.assign(&ndarray::ArrayView1::from(features.as_slice()));
        }
        Ok(x)
    }
}

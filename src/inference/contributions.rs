//! Per-feature contribution scores
//!
//! A score is the raw feature value (category code or numeric value) times a
//! fixed multiplier. It is a display heuristic only: it does not decompose
//! the polynomial model and the scores do not sum to the predicted price.

use crate::preprocessing::FeatureVector;
use serde::{Deserialize, Serialize};

/// Display score for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Human readable feature label
    pub feature: String,
    pub score: f64,
}

/// Scores for every feature, in feature order
pub fn heuristic_contributions(features: &FeatureVector, scale: f64) -> Vec<Contribution> {
    features
        .iter()
        .map(|(attribute, value)| Contribution {
            feature: attribute.label().to_string(),
            score: value * scale,
        })
        .collect()
}

/// Look up a score by feature label, case-insensitively
pub fn find_contribution<'a>(contributions: &'a [Contribution], feature: &str) -> Option<&'a Contribution> {
    contributions
        .iter()
        .find(|c| c.feature.eq_ignore_ascii_case(feature))
}

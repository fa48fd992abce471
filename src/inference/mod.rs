//! Inference module
//!
//! Scores new properties with a trained model:
//! - Request validation against vocabularies and numeric ranges
//! - Price prediction with per-feature display scores
//! - Comparable combinations and region by unit type price matrix
//! - Session prediction history

mod config;
mod engine;
pub mod contributions;
pub mod history;
pub mod market;

pub use config::InferenceConfig;
pub use contributions::Contribution;
pub use engine::{Prediction, PriceEstimator};
pub use history::{HistoryEntry, PredictionHistory};
pub use market::{Comparable, MarketAnalyzer, PriceMatrix};

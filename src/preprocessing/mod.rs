//! Data preprocessing module
//!
//! Turns raw housing records into model-ready features:
//! - Housing record and attribute definitions
//! - Record cleaning (duplicates, missing values, outliers)
//! - Categorical label encoding with frozen vocabularies
//! - Fixed-order feature vector construction
//! - Feature standardization

mod config;
mod scaler;
pub mod cleaning;
pub mod encoder;
pub mod features;
pub mod record;

pub use cleaning::{quantile_sorted, CleaningReport, DataCleaner};
pub use config::CleaningConfig;
pub use encoder::{normalize, CategoryEncoder, Vocabulary};
pub use features::{FeatureBuilder, FeatureVector};
pub use record::{
    Attribute, HousingRecord, PropertyAttributes, CATEGORICAL_ATTRIBUTES, FEATURE_ORDER, N_FEATURES,
};
pub use scaler::{ScalerParams, StandardScaler};

//! Resale Valuation - housing resale price estimation
//!
//! Fits a polynomial regression model to historical resale transactions and
//! serves price estimates for new properties.
//!
//! # Modules
//!
//! ## Core
//! - [`preprocessing`] - Records, cleaning, category encoding, feature vectors, scaling
//! - [`feature_engineering`] - Polynomial basis expansion
//! - [`training`] - Least squares fitting, train/test split, metrics
//! - [`inference`] - Validated prediction, contributions, market comparison
//!
//! ## Data
//! - [`utils`] - Table loading and record conversion
//! - [`synthetic`] - Seeded synthetic transaction tables
//!
//! ## Interface
//! - [`config`] - JSON application configuration
//! - [`cli`] - Command-line and interactive interface
//!
//! # Example
//!
//! ```no_run
//! use resale_valuation::inference::InferenceConfig;
//! use resale_valuation::preprocessing::PropertyAttributes;
//! use resale_valuation::synthetic::SyntheticHousing;
//! use resale_valuation::training::{TrainEngine, TrainingConfig};
//!
//! let records = SyntheticHousing::new(42).generate()?;
//! let mut engine = TrainEngine::new(TrainingConfig::default());
//! engine.fit(&records)?;
//! let estimator = engine.into_estimator(InferenceConfig::default())?;
//!
//! let request = PropertyAttributes::new()
//!     .with_region("BEDOK")
//!     .with_unit_type("4 ROOM")
//!     .with_storey_band("04 TO 06")
//!     .with_build_model("MODEL A")
//!     .with_floor_area(70.0)
//!     .with_remaining_lease(70.0);
//! println!("{:.0}", estimator.predict(&request)?.price);
//! # Ok::<(), resale_valuation::error::ValuationError>(())
//! ```

// Core error handling
pub mod error;

// Core ML modules
pub mod preprocessing;
pub mod feature_engineering;
pub mod training;
pub mod inference;

// Data
pub mod synthetic;
pub mod utils;

// Interface
pub mod config;
pub mod cli;

pub use error::{Result, ValuationError};

//! Model training module
//!
//! Fits the resale price model:
//! - Least squares and polynomial regression
//! - Seeded train/test split and fit-quality metrics
//! - Training summary reporting

mod config;
mod engine;
mod models;
pub mod linear_models;

pub use config::TrainingConfig;
pub use engine::TrainEngine;
pub use linear_models::{solve_least_squares, LinearRegression, PolynomialRegression};
pub use models::{ModelMetrics, TrainingSummary};

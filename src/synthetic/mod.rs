//! Synthetic data generation module
//!
//! Seeded housing transaction tables for demos, tests and benchmarks.

mod housing;

pub use housing::SyntheticHousing;

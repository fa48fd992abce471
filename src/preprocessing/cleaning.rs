//! Record cleaning before training
//!
//! Steps run in a fixed order: duplicates, missing values, price outliers,
//! floor area bounds, then category normalization. Each step can be switched
//! off through [`CleaningConfig`].

use super::config::CleaningConfig;
use super::encoder::normalize;
use super::record::{HousingRecord, CATEGORICAL_ATTRIBUTES};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Counts of records removed by each cleaning step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub initial_count: usize,
    pub duplicates_removed: usize,
    pub missing_removed: usize,
    pub price_outliers_removed: usize,
    pub floor_area_removed: usize,
    pub final_count: usize,
}

impl CleaningReport {
    pub fn total_removed(&self) -> usize {
        self.initial_count - self.final_count
    }
}

/// Applies the configured cleaning steps to a set of records
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    config: CleaningConfig,
}

impl DataCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    pub fn clean(&self, records: Vec<HousingRecord>) -> (Vec<HousingRecord>, CleaningReport) {
        let mut report = CleaningReport {
            initial_count: records.len(),
            ..Default::default()
        };
        let mut records = records;

        if self.config.drop_duplicates {
            let before = records.len();
            let mut seen = HashSet::new();
            records.retain(|r| seen.insert(dedup_key(r)));
            report.duplicates_removed = before - records.len();
        }

        if self.config.drop_missing {
            let before = records.len();
            records.retain(has_finite_values);
            report.missing_removed = before - records.len();
            if report.missing_removed > 0 {
                debug!(removed = report.missing_removed, "Dropped records with missing values");
            }
        }

        if let (Some(lo), Some(hi)) = (self.config.price_lower_quantile, self.config.price_upper_quantile) {
            let mut prices: Vec<f64> = records
                .iter()
                .filter_map(|r| r.price)
                .filter(|p| p.is_finite())
                .collect();
            if !prices.is_empty() {
                prices.sort_by(|a, b| a.total_cmp(b));
                let lower = quantile_sorted(&prices, lo);
                let upper = quantile_sorted(&prices, hi);
                let before = records.len();
                records.retain(|r| r.price.map_or(true, |p| p >= lower && p <= upper));
                report.price_outliers_removed = before - records.len();
            }
        }

        if self.config.min_floor_area.is_some() || self.config.max_floor_area.is_some() {
            let min = self.config.min_floor_area.unwrap_or(f64::NEG_INFINITY);
            let max = self.config.max_floor_area.unwrap_or(f64::INFINITY);
            let before = records.len();
            records.retain(|r| {
                r.attributes
                    .floor_area_sqm
                    .map_or(true, |a| a >= min && a <= max)
            });
            report.floor_area_removed = before - records.len();
        }

        if self.config.normalize_categories {
            for record in &mut records {
                for &attribute in &CATEGORICAL_ATTRIBUTES {
                    if let Some(value) = record.attributes.category(attribute) {
                        let value = normalize(value);
                        record.attributes.set_category(attribute, value);
                    }
                }
            }
        }

        report.final_count = records.len();
        info!(
            duplicates = report.duplicates_removed,
            missing = report.missing_removed,
            price_outliers = report.price_outliers_removed,
            floor_area = report.floor_area_removed,
            remaining = report.final_count,
            "Cleaned dataset"
        );

        (records, report)
    }
}

/// Every attribute present, with finite numerics and price
fn has_finite_values(record: &HousingRecord) -> bool {
    let a = &record.attributes;
    a.is_complete()
        && [a.floor_area_sqm, a.remaining_lease, record.price]
            .iter()
            .all(|v| v.is_some_and(f64::is_finite))
}

/// Quantile of sorted data with linear interpolation between closest ranks
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

type DedupKey = ([Option<String>; 4], [Option<u64>; 3]);

fn dedup_key(record: &HousingRecord) -> DedupKey {
    let a = &record.attributes;
    (
        [
            a.region.clone(),
            a.unit_type.clone(),
            a.storey_band.clone(),
            a.build_model.clone(),
        ],
        [
            a.floor_area_sqm.map(f64::to_bits),
            a.remaining_lease.map(f64::to_bits),
            record.price.map(f64::to_bits),
        ],
    )
}

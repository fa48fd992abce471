//! Market comparison data
//!
//! Re-scores the request across region and unit type combinations to find
//! similarly priced alternatives and to fill a region by unit type matrix.

use super::PriceEstimator;
use crate::error::Result;
use crate::preprocessing::{normalize, Attribute, PropertyAttributes};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One region and unit type combination with its predicted price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparable {
    pub region: String,
    pub unit_type: String,
    pub price: f64,
    /// Whether this is the request's own combination
    pub is_selected: bool,
}

/// Predicted prices for regions (rows) by unit types (columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMatrix {
    pub regions: Vec<String>,
    pub unit_types: Vec<String>,
    pub prices: Array2<f64>,
    /// `(row, col)` of the request's combination when it is shown
    pub selected: Option<(usize, usize)>,
}

/// Comparison queries over a trained estimator
#[derive(Debug, Clone, Copy)]
pub struct MarketAnalyzer<'a> {
    estimator: &'a PriceEstimator,
}

impl<'a> MarketAnalyzer<'a> {
    pub fn new(estimator: &'a PriceEstimator) -> Self {
        Self { estimator }
    }

    /// Combinations priced within the configured band of `reference_price`,
    /// in region then unit type order. When none qualify, the nearest few
    /// ordered by distance from the reference.
    pub fn comparables(&self, request: &PropertyAttributes, reference_price: f64) -> Result<Vec<Comparable>> {
        let config = self.estimator.config();
        let all = self.all_combinations(request)?;

        let low = reference_price * (1.0 - config.comparable_band);
        let high = reference_price * (1.0 + config.comparable_band);
        let within: Vec<Comparable> = all
            .iter()
            .filter(|c| c.price >= low && c.price <= high)
            .cloned()
            .collect();
        if !within.is_empty() {
            return Ok(within);
        }

        let mut nearest = all;
        nearest.sort_by(|a, b| {
            (a.price - reference_price)
                .abs()
                .total_cmp(&(b.price - reference_price).abs())
        });
        nearest.truncate(config.fallback_comparables);
        Ok(nearest)
    }

    /// Prices for the first regions of the vocabulary across all unit types
    pub fn price_matrix(&self, request: &PropertyAttributes) -> Result<PriceMatrix> {
        let max_regions = self.estimator.config().max_matrix_regions;
        let regions: Vec<String> = self
            .estimator
            .vocabulary(Attribute::Region)?
            .iter()
            .take(max_regions)
            .cloned()
            .collect();
        let unit_types: Vec<String> = self.estimator.vocabulary(Attribute::UnitType)?.to_vec();

        let mut prices = Array2::zeros((regions.len(), unit_types.len()));
        for (i, region) in regions.iter().enumerate() {
            for (j, unit_type) in unit_types.iter().enumerate() {
                let candidate = request
                    .clone()
                    .with_region(region.clone())
                    .with_unit_type(unit_type.clone());
                prices[[i, j]] = self.estimator.predict(&candidate)?.price;
            }
        }

        let selected_region = request.region.as_deref().map(normalize);
        let selected_unit = request.unit_type.as_deref().map(normalize);
        let selected = match (selected_region, selected_unit) {
            (Some(r), Some(u)) => regions
                .iter()
                .position(|x| *x == r)
                .zip(unit_types.iter().position(|x| *x == u)),
            _ => None,
        };

        Ok(PriceMatrix {
            regions,
            unit_types,
            prices,
            selected,
        })
    }

    fn all_combinations(&self, request: &PropertyAttributes) -> Result<Vec<Comparable>> {
        let regions = self.estimator.vocabulary(Attribute::Region)?;
        let unit_types = self.estimator.vocabulary(Attribute::UnitType)?;
        let selected_region = request.region.as_deref().map(normalize);
        let selected_unit = request.unit_type.as_deref().map(normalize);

        let mut out = Vec::with_capacity(regions.len() * unit_types.len());
        for region in regions {
            for unit_type in unit_types {
                let candidate = request
                    .clone()
                    .with_region(region.clone())
                    .with_unit_type(unit_type.clone());
                let price = self.estimator.predict(&candidate)?.price;
                out.push(Comparable {
                    region: region.clone(),
                    unit_type: unit_type.clone(),
                    price,
                    is_selected: selected_region.as_ref() == Some(region)
                        && selected_unit.as_ref() == Some(unit_type),
                });
            }
        }
        Ok(out)
    }
}

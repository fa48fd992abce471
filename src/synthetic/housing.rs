//! Seeded synthetic resale transactions

use crate::error::{Result, ValuationError};
use crate::preprocessing::{HousingRecord, PropertyAttributes};
use crate::utils::{records_to_dataframe, ColumnMapping};
use polars::prelude::DataFrame;
use rand::prelude::*;

/// Generator for a smooth, noisy housing price table.
///
/// Price is additive in the category positions, floor area and remaining
/// lease, plus uniform noise in `[-noise, noise]`. Floor area grows with the
/// unit type position so larger types are larger flats.
#[derive(Debug, Clone)]
pub struct SyntheticHousing {
    seed: u64,
    n_rows: usize,
    regions: Vec<String>,
    unit_types: Vec<String>,
    storey_bands: Vec<String>,
    build_models: Vec<String>,
    noise: f64,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl SyntheticHousing {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            n_rows: 500,
            regions: owned(&["ANG MO KIO", "BEDOK", "TAMPINES"]),
            unit_types: owned(&["3 ROOM", "4 ROOM", "5 ROOM"]),
            storey_bands: owned(&["01 TO 03", "04 TO 06", "07 TO 09"]),
            build_models: owned(&["IMPROVED", "MODEL A", "NEW GENERATION"]),
            noise: 5_000.0,
        }
    }

    pub fn with_rows(mut self, n_rows: usize) -> Self {
        self.n_rows = n_rows;
        self
    }

    pub fn with_regions(mut self, regions: &[&str]) -> Self {
        self.regions = owned(regions);
        self
    }

    pub fn with_unit_types(mut self, unit_types: &[&str]) -> Self {
        self.unit_types = owned(unit_types);
        self
    }

    pub fn with_storey_bands(mut self, bands: &[&str]) -> Self {
        self.storey_bands = owned(bands);
        self
    }

    pub fn with_build_models(mut self, models: &[&str]) -> Self {
        self.build_models = owned(models);
        self
    }

    /// Half-width of the uniform price noise
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise.abs();
        self
    }

    /// Noise-free price for a combination of category positions and numerics
    pub fn base_price(region: usize, unit_type: usize, storey: usize, model: usize, area: f64, lease: f64) -> f64 {
        120_000.0
            + region as f64 * 40_000.0
            + unit_type as f64 * 60_000.0
            + storey as f64 * 15_000.0
            + model as f64 * 8_000.0
            + area * 3_500.0
            + (lease - 40.0) * 2_000.0
    }

    pub fn generate(&self) -> Result<Vec<HousingRecord>> {
        if self.regions.is_empty()
            || self.unit_types.is_empty()
            || self.storey_bands.is_empty()
            || self.build_models.is_empty()
        {
            return Err(ValuationError::InvalidParameter {
                name: "categories".to_string(),
                value: "[]".to_string(),
                reason: "every categorical attribute needs at least one value".to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let records = (0..self.n_rows)
            .map(|_| {
                let r = rng.gen_range(0..self.regions.len());
                let u = rng.gen_range(0..self.unit_types.len());
                let s = rng.gen_range(0..self.storey_bands.len());
                let m = rng.gen_range(0..self.build_models.len());
                let area_low = 40.0 + 20.0 * u as f64;
                let area: f64 = rng.gen_range(area_low..area_low + 20.0);
                let lease: f64 = rng.gen_range(45.0..95.0);
                let noise = if self.noise > 0.0 {
                    rng.gen_range(-self.noise..=self.noise)
                } else {
                    0.0
                };
                let price = Self::base_price(r, u, s, m, area, lease) + noise;

                HousingRecord::new(
                    PropertyAttributes::new()
                        .with_region(self.regions[r].clone())
                        .with_unit_type(self.unit_types[u].clone())
                        .with_storey_band(self.storey_bands[s].clone())
                        .with_build_model(self.build_models[m].clone())
                        .with_floor_area((area * 10.0).round() / 10.0)
                        .with_remaining_lease((lease * 10.0).round() / 10.0),
                    price.round(),
                )
            })
            .collect();

        Ok(records)
    }

    /// Generate records laid out as a table
    pub fn to_dataframe(&self, mapping: &ColumnMapping) -> Result<DataFrame> {
        records_to_dataframe(&self.generate()?, mapping)
    }
}

//! Data loading utilities
//!
//! Reads transaction tables with polars and converts them to and from
//! [`HousingRecord`]s through a [`ColumnMapping`].

use crate::error::{Result, ValuationError};
use crate::preprocessing::{Attribute, HousingRecord, PropertyAttributes, FEATURE_ORDER};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Table column names for each attribute and the price label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub region: String,
    pub unit_type: String,
    pub storey_band: String,
    pub build_model: String,
    pub floor_area_sqm: String,
    pub remaining_lease: String,
    pub price: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            region: "town".to_string(),
            unit_type: "flat_type".to_string(),
            storey_band: "storey_range".to_string(),
            build_model: "flat_model".to_string(),
            floor_area_sqm: "floor_area_sqm".to_string(),
            remaining_lease: "remaining_lease".to_string(),
            price: "resale_price".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Mapping where every column is named by the attribute key and the label is `price`
    pub fn attribute_keys() -> Self {
        Self {
            region: Attribute::Region.key().to_string(),
            unit_type: Attribute::UnitType.key().to_string(),
            storey_band: Attribute::StoreyBand.key().to_string(),
            build_model: Attribute::BuildModel.key().to_string(),
            floor_area_sqm: Attribute::FloorAreaSqm.key().to_string(),
            remaining_lease: Attribute::RemainingLease.key().to_string(),
            price: "price".to_string(),
        }
    }

    /// Builder method to rename the price column
    pub fn with_price(mut self, column: impl Into<String>) -> Self {
        self.price = column.into();
        self
    }

    pub fn column(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Region => &self.region,
            Attribute::UnitType => &self.unit_type,
            Attribute::StoreyBand => &self.storey_band,
            Attribute::BuildModel => &self.build_model,
            Attribute::FloorAreaSqm => &self.floor_area_sqm,
            Attribute::RemainingLease => &self.remaining_lease,
        }
    }
}

/// Data loader for CSV, Parquet and JSON tables
#[derive(Debug, Clone)]
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
        }
    }

    /// Rows scanned to infer CSV column types
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Detect file format from extension and load
    pub fn load(&self, path: &Path) -> Result<DataFrame> {
        let start = Instant::now();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let df = match ext.as_str() {
            "csv" => self.load_csv(path)?,
            "parquet" => self.load_parquet(path)?,
            "json" => self.load_json(path)?,
            other => {
                return Err(ValuationError::DataError(format!(
                    "Unsupported file format: '{}'",
                    other
                )))
            }
        };

        info!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded table"
        );
        Ok(df)
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Ok(df)
    }

    /// Load a Parquet file
    pub fn load_parquet(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        Ok(ParquetReader::new(file).finish()?)
    }

    /// Load a JSON file
    pub fn load_json(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        Ok(JsonReader::new(file).finish()?)
    }
}

/// Save a table as CSV
pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Parse a remaining lease given either as a number of years or as text
/// such as `"61 years 04 months"`.
pub fn parse_lease_years(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(years) = text.parse::<f64>() {
        return Some(years);
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut total = 0.0;
    let mut matched = false;
    for pair in tokens.chunks(2) {
        let [amount, unit] = pair else { return None };
        let amount: f64 = amount.parse().ok()?;
        let unit = unit.to_lowercase();
        if unit.starts_with("year") {
            total += amount;
        } else if unit.starts_with("month") {
            total += amount / 12.0;
        } else {
            return None;
        }
        matched = true;
    }
    matched.then_some(total)
}

fn column_series(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map(|c| c.as_materialized_series().clone())
        .map_err(|_| ValuationError::FeatureNotFound(name.to_string()))
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = column_series(df, name)?.cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Numeric cells of a column. Text cells go through `parse_text`; nulls and
/// non-finite values (`NaN`, `inf`) come back as `None`.
fn numeric_values(df: &DataFrame, name: &str, parse_text: fn(&str) -> Option<f64>) -> Result<Vec<Option<f64>>> {
    let series = column_series(df, name)?;
    let values: Vec<Option<f64>> = if series.dtype() == &DataType::String {
        series.str()?.into_iter().map(|v| v.and_then(parse_text)).collect()
    } else {
        series.cast(&DataType::Float64)?.f64()?.into_iter().collect()
    };
    Ok(values
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

fn parse_plain_number(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Convert a table into housing records.
///
/// Categorical columns are read as text, numeric columns as `f64`. Null and
/// non-finite cells become `None`. Only remaining lease may be given as text
/// like `"N years M months"`; other numeric text must be a plain number.
pub fn records_from_dataframe(df: &DataFrame, mapping: &ColumnMapping) -> Result<Vec<HousingRecord>> {
    if df.column(&mapping.price).is_err() {
        return Err(ValuationError::MissingLabelColumn(mapping.price.clone()));
    }
    let prices = numeric_values(df, &mapping.price, parse_plain_number)?;

    let mut records: Vec<HousingRecord> = prices
        .into_iter()
        .map(|price| HousingRecord {
            attributes: PropertyAttributes::new(),
            price,
        })
        .collect();

    for &attribute in &FEATURE_ORDER {
        let column = mapping.column(attribute);
        if attribute.is_categorical() {
            for (record, value) in records.iter_mut().zip(string_values(df, column)?) {
                if let Some(value) = value {
                    record.attributes.set_category(attribute, value);
                }
            }
        } else {
            let parse_text: fn(&str) -> Option<f64> = match attribute {
                Attribute::RemainingLease => parse_lease_years,
                _ => parse_plain_number,
            };
            for (record, value) in records.iter_mut().zip(numeric_values(df, column, parse_text)?) {
                if let Some(value) = value {
                    record.attributes.set_numeric(attribute, value);
                }
            }
        }
    }

    let incomplete = records
        .iter()
        .filter(|r| !r.attributes.is_complete() || r.price.is_none())
        .count();
    if incomplete > 0 {
        warn!(incomplete, "Table has records with missing values");
    }

    Ok(records)
}

/// Convert housing records into a table laid out by `mapping`
pub fn records_to_dataframe(records: &[HousingRecord], mapping: &ColumnMapping) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(FEATURE_ORDER.len() + 1);

    for &attribute in &FEATURE_ORDER {
        let name = mapping.column(attribute);
        let column = if attribute.is_categorical() {
            let values: Vec<Option<&str>> = records.iter().map(|r| r.attributes.category(attribute)).collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.attributes.numeric(attribute)).collect();
            Column::new(name.into(), values)
        };
        columns.push(column);
    }

    let prices: Vec<Option<f64>> = records.iter().map(|r| r.price).collect();
    columns.push(Column::new(mapping.price.as_str().into(), prices));

    Ok(DataFrame::new(columns)?)
}

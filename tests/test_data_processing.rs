//! Integration tests for data processing: loading, conversion, and cleaning

use polars::prelude::*;
use resale_valuation::preprocessing::{
    quantile_sorted, CleaningConfig, DataCleaner, HousingRecord, PropertyAttributes,
};
use resale_valuation::synthetic::SyntheticHousing;
use resale_valuation::utils::{
    parse_lease_years, records_from_dataframe, records_to_dataframe, save_csv, ColumnMapping, DataLoader,
};
use resale_valuation::ValuationError;
use std::io::Write;

fn record(region: &str, area: f64, price: f64) -> HousingRecord {
    HousingRecord::new(
        PropertyAttributes::new()
            .with_region(region)
            .with_unit_type("4 ROOM")
            .with_storey_band("04 TO 06")
            .with_build_model("MODEL A")
            .with_floor_area(area)
            .with_remaining_lease(70.0),
        price,
    )
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_csv_with_text_lease() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "town,flat_type,storey_range,flat_model,floor_area_sqm,remaining_lease,resale_price").unwrap();
    writeln!(file, "BEDOK,4 ROOM,04 TO 06,MODEL A,92,61 years 06 months,450000").unwrap();
    writeln!(file, "yishun,3 ROOM,01 TO 03,Improved,67,70 years,320000").unwrap();
    file.flush().unwrap();

    let df = DataLoader::new().load(file.path()).unwrap();
    assert_eq!(df.height(), 2);

    let records = records_from_dataframe(&df, &ColumnMapping::default()).unwrap();
    assert_eq!(records[0].attributes.remaining_lease, Some(61.5));
    assert_eq!(records[1].attributes.remaining_lease, Some(70.0));
    assert_eq!(records[1].attributes.build_model.as_deref(), Some("Improved"));
    assert_eq!(records[0].price, Some(450_000.0));
}

#[test]
fn test_unsupported_extension() {
    let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    let result = DataLoader::new().load(file.path());
    assert!(matches!(result, Err(ValuationError::DataError(_))));
}

#[test]
fn test_missing_file() {
    let result = DataLoader::new().load(std::path::Path::new("does/not/exist.csv"));
    assert!(result.is_err());
}

#[test]
fn test_synthetic_table_round_trip_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample_data.csv");
    let mapping = ColumnMapping::default();

    let mut df = SyntheticHousing::new(5).with_rows(50).to_dataframe(&mapping).unwrap();
    save_csv(&mut df, &path).unwrap();

    let loaded = DataLoader::new().load(&path).unwrap();
    assert_eq!(loaded.shape(), (50, 7));
    let records = records_from_dataframe(&loaded, &mapping).unwrap();
    assert!(records.iter().all(|r| r.attributes.is_complete() && r.price.is_some()));
}

#[test]
fn test_custom_column_mapping() {
    let records = vec![record("BEDOK", 90.0, 400_000.0)];
    let mapping = ColumnMapping::attribute_keys().with_price("price");
    let df = records_to_dataframe(&records, &mapping).unwrap();

    assert!(df.column("region").is_ok());
    assert!(df.column("price").is_ok());
    let back = records_from_dataframe(&df, &mapping).unwrap();
    assert_eq!(back, records);
}

#[test]
fn test_missing_columns() {
    let df = df!(
        "town" => &["BEDOK"],
        "resale_price" => &[400_000.0]
    )
    .unwrap();
    let err = records_from_dataframe(&df, &ColumnMapping::default()).unwrap_err();
    assert!(matches!(err, ValuationError::FeatureNotFound(ref c) if c == "flat_type"));

    let err = records_from_dataframe(&df, &ColumnMapping::default().with_price("price")).unwrap_err();
    assert!(matches!(err, ValuationError::MissingLabelColumn(ref c) if c == "price"));
}

#[test]
fn test_null_cells_become_missing() {
    let df = df!(
        "town" => &[Some("BEDOK"), None],
        "flat_type" => &["4 ROOM", "4 ROOM"],
        "storey_range" => &["04 TO 06", "04 TO 06"],
        "flat_model" => &["MODEL A", "MODEL A"],
        "floor_area_sqm" => &[Some(90.0), Some(91.0)],
        "remaining_lease" => &[Some(70.0), None],
        "resale_price" => &[Some(400_000.0), Some(410_000.0)]
    )
    .unwrap();

    let records = records_from_dataframe(&df, &ColumnMapping::default()).unwrap();
    assert!(records[0].attributes.is_complete());
    assert_eq!(records[1].attributes.region, None);
    assert_eq!(records[1].attributes.remaining_lease, None);
}

#[test]
fn test_parse_lease_text() {
    assert_eq!(parse_lease_years("94 years 03 months"), Some(94.25));
    assert_eq!(parse_lease_years(" 88 "), Some(88.0));
    assert_eq!(parse_lease_years(""), None);
    assert_eq!(parse_lease_years("ninety years"), None);
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_cleaning_removes_duplicates_and_incomplete() {
    let mut incomplete = record("BEDOK", 90.0, 400_000.0);
    incomplete.attributes.storey_band = None;

    let records = vec![
        record("BEDOK", 90.0, 400_000.0),
        record("BEDOK", 90.0, 400_000.0),
        incomplete,
        record("YISHUN", 85.0, 380_000.0),
    ];

    let cleaner = DataCleaner::new(CleaningConfig::new().without_price_trim());
    let (kept, report) = cleaner.clean(records);

    assert_eq!(kept.len(), 2);
    assert_eq!(report.initial_count, 4);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.missing_removed, 1);
    assert_eq!(report.total_removed(), 2);
    assert_eq!(report.final_count, 2);
}

#[test]
fn test_cleaning_floor_area_bounds() {
    let records = vec![
        record("BEDOK", 25.0, 200_000.0),
        record("BEDOK", 30.0, 210_000.0),
        record("BEDOK", 250.0, 900_000.0),
        record("BEDOK", 260.0, 950_000.0),
    ];

    let cleaner = DataCleaner::new(CleaningConfig::new().without_price_trim());
    let (kept, report) = cleaner.clean(records);
    assert_eq!(report.floor_area_removed, 2);
    let areas: Vec<f64> = kept.iter().filter_map(|r| r.attributes.floor_area_sqm).collect();
    assert_eq!(areas, vec![30.0, 250.0]);
}

#[test]
fn test_cleaning_trims_price_tails() {
    let mut records: Vec<HousingRecord> = (0..200)
        .map(|i| record("BEDOK", 60.0 + (i % 50) as f64, 300_000.0 + i as f64 * 1_000.0))
        .collect();
    records.push(record("BEDOK", 70.0, 5_000_000.0));

    let cleaner = DataCleaner::new(CleaningConfig::new().with_price_quantiles(0.01, 0.99));
    let (kept, report) = cleaner.clean(records);

    assert!(report.price_outliers_removed >= 2);
    assert!(kept.iter().all(|r| r.price.unwrap() < 5_000_000.0));
}

#[test]
fn test_cleaning_normalizes_categories() {
    let records = vec![record("  bedok ", 90.0, 400_000.0)];
    let (kept, _) = DataCleaner::new(CleaningConfig::new()).clean(records);
    assert_eq!(kept[0].attributes.region.as_deref(), Some("BEDOK"));

    let records = vec![record("  bedok ", 90.0, 400_000.0)];
    let (kept, _) = DataCleaner::new(CleaningConfig::minimal()).clean(records);
    assert_eq!(kept[0].attributes.region.as_deref(), Some("  bedok "));
}

#[test]
fn test_quantile_interpolation() {
    let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
    assert_eq!(quantile_sorted(&sorted, 0.5), 3.0);
    assert_eq!(quantile_sorted(&sorted, 0.125), 1.5);
    assert_eq!(quantile_sorted(&sorted, 1.0), 5.0);
    assert!(quantile_sorted(&[], 0.5).is_nan());
}

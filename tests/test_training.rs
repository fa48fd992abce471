//! Integration test: Training pipeline end-to-end

use polars::prelude::*;
use resale_valuation::feature_engineering::{polynomial_term_count, FeatureTransformer, PolynomialFeatures};
use resale_valuation::inference::InferenceConfig;
use resale_valuation::preprocessing::{DataCleaner, CleaningConfig, HousingRecord, PropertyAttributes};
use resale_valuation::synthetic::SyntheticHousing;
use resale_valuation::training::{TrainEngine, TrainingConfig};
use resale_valuation::utils::{records_from_dataframe, save_csv, ColumnMapping, DataLoader};
use resale_valuation::ValuationError;
use ndarray::Array2;
use std::io::Write;

fn linear_records(n: usize) -> Vec<HousingRecord> {
    (0..n)
        .map(|i| {
            let area = 45.0 + (i % 17) as f64 * 5.0;
            let lease = 50.0 + (i % 11) as f64 * 4.0;
            let region = ["BEDOK", "CLEMENTI", "YISHUN"][i % 3];
            HousingRecord::new(
                PropertyAttributes::new()
                    .with_region(region)
                    .with_unit_type("4 ROOM")
                    .with_storey_band("04 TO 06")
                    .with_build_model("MODEL A")
                    .with_floor_area(area)
                    .with_remaining_lease(lease),
                100_000.0 + area * 4_000.0,
            )
        })
        .collect()
}

fn hdb_df() -> DataFrame {
    df!(
        "town" => &["BEDOK", "BEDOK", "TAMPINES", "TAMPINES", "YISHUN", "YISHUN",
                    "BEDOK", "TAMPINES", "YISHUN", "BEDOK"],
        "flat_type" => &["3 ROOM", "4 ROOM", "3 ROOM", "4 ROOM", "3 ROOM", "4 ROOM",
                         "4 ROOM", "3 ROOM", "4 ROOM", "3 ROOM"],
        "storey_range" => &["01 TO 03", "04 TO 06", "07 TO 09", "01 TO 03", "04 TO 06",
                            "07 TO 09", "01 TO 03", "04 TO 06", "07 TO 09", "04 TO 06"],
        "flat_model" => &["IMPROVED", "MODEL A", "IMPROVED", "MODEL A", "IMPROVED",
                          "MODEL A", "IMPROVED", "MODEL A", "IMPROVED", "MODEL A"],
        "floor_area_sqm" => &[67.0, 92.0, 68.0, 95.0, 66.0, 90.0, 91.0, 69.0, 93.0, 65.0],
        "remaining_lease" => &[55.0, 70.0, 60.0, 75.0, 58.0, 72.0, 66.0, 61.0, 74.0, 57.0],
        "resale_price" => &[310_000.0, 450_000.0, 330_000.0, 480_000.0, 300_000.0,
                            440_000.0, 445_000.0, 335_000.0, 455_000.0, 305_000.0]
    )
    .unwrap()
}

#[test]
fn test_degree_one_recovers_linear_relationship() {
    let config = TrainingConfig::new().with_degree(1);
    let mut engine = TrainEngine::new(config);
    engine.fit(&linear_records(40)).unwrap();

    let summary = engine.summary().unwrap();
    assert_eq!(summary.train_sample_count, 32);
    assert_eq!(summary.test_sample_count, 8);
    assert_eq!(summary.expanded_feature_count, 6);
    assert!(summary.test_r2 >= 0.95, "test R² was {}", summary.test_r2);
}

#[test]
fn test_default_degree_expands_to_209_terms() {
    assert_eq!(polynomial_term_count(6, 4), 209);

    let x = Array2::from_shape_fn((5, 6), |(i, j)| (i * 6 + j) as f64);
    let mut poly = PolynomialFeatures::new(4);
    let expanded = poly.fit_transform(&x).unwrap();
    assert_eq!(expanded.dim(), (5, 209));
    assert_eq!(poly.get_feature_names().len(), 209);
}

#[test]
fn test_summary_reports_expanded_width() {
    let records = SyntheticHousing::new(3).with_rows(120).generate().unwrap();
    let mut engine = TrainEngine::new(TrainingConfig::default());
    engine.fit(&records).unwrap();

    let summary = engine.summary().unwrap();
    assert_eq!(summary.degree, 4);
    assert_eq!(summary.raw_feature_count, 6);
    assert_eq!(summary.expanded_feature_count, 209);
    assert!(summary.effective_rank <= 209);
    assert_eq!(summary.train_sample_count + summary.test_sample_count, 120);
}

#[test]
fn test_constant_price_gives_zero_r2() {
    let records: Vec<HousingRecord> = linear_records(25)
        .into_iter()
        .map(|mut r| {
            r.price = Some(400_000.0);
            r
        })
        .collect();

    let mut engine = TrainEngine::new(TrainingConfig::new().with_degree(2));
    engine.fit(&records).unwrap();
    let summary = engine.summary().unwrap();
    assert_eq!(summary.test_r2, 0.0);
    assert!(summary.test_mae < 1e-3);

    let estimator = engine.into_estimator(InferenceConfig::default()).unwrap();
    let price = estimator.predict(&linear_records(1)[0].attributes).unwrap().price;
    assert!((price - 400_000.0).abs() < 1e-3);
}

#[test]
fn test_same_seed_same_model() {
    let records = SyntheticHousing::new(8).with_rows(150).generate().unwrap();

    let mut a = TrainEngine::new(TrainingConfig::new().with_degree(2));
    let mut b = TrainEngine::new(TrainingConfig::new().with_degree(2));
    a.fit(&records).unwrap();
    b.fit(&records).unwrap();

    assert_eq!(a.model().unwrap().coefficients(), b.model().unwrap().coefficients());
    assert_eq!(a.summary().unwrap().test_r2, b.summary().unwrap().test_r2);
}

#[test]
fn test_fit_dataframe_with_cleaning() {
    let df = hdb_df();
    let cleaner = DataCleaner::new(CleaningConfig::new().without_price_trim());
    let mut engine = TrainEngine::new(TrainingConfig::new().with_degree(1));
    engine
        .fit_dataframe(&df, &ColumnMapping::default(), Some(&cleaner))
        .unwrap();

    assert!(engine.is_fitted());
    let summary = engine.summary().unwrap();
    assert_eq!(summary.train_sample_count, 8);
    assert_eq!(summary.test_sample_count, 2);
}

#[test]
fn test_empty_table_rejected() {
    let df = hdb_df().head(Some(0));
    let mut engine = TrainEngine::new(TrainingConfig::default());
    let result = engine.fit_dataframe(&df, &ColumnMapping::default(), None);
    assert!(matches!(result, Err(ValuationError::EmptyDataset)));
    assert!(!engine.is_fitted());
}

#[test]
fn test_missing_label_column_rejected() {
    let df = hdb_df().drop("resale_price").unwrap();
    let mut engine = TrainEngine::new(TrainingConfig::default());
    let result = engine.fit_dataframe(&df, &ColumnMapping::default(), None);
    assert!(matches!(result, Err(ValuationError::MissingLabelColumn(ref c)) if c == "resale_price"));
}

#[test]
fn test_untrained_engine_has_no_estimator() {
    let engine = TrainEngine::new(TrainingConfig::default());
    assert!(matches!(
        engine.into_estimator(InferenceConfig::default()),
        Err(ValuationError::ModelNotTrained)
    ));
}

#[test]
fn test_invalid_degree_rejected() {
    let mut engine = TrainEngine::new(TrainingConfig::new().with_degree(0));
    assert!(engine.fit(&linear_records(20)).is_err());
}

#[test]
fn test_synthetic_end_to_end() {
    let records = SyntheticHousing::new(42).with_rows(500).generate().unwrap();
    let mut engine = TrainEngine::new(TrainingConfig::default());
    engine.fit(&records).unwrap();

    let summary = engine.summary().unwrap().clone();
    assert_eq!(summary.train_sample_count, 400);
    assert_eq!(summary.test_sample_count, 100);
    assert!(summary.test_r2 > 0.9, "test R² was {}", summary.test_r2);

    let estimator = engine.into_estimator(InferenceConfig::default()).unwrap();
    let request = PropertyAttributes::new()
        .with_region("BEDOK")
        .with_unit_type("4 ROOM")
        .with_storey_band("04 TO 06")
        .with_build_model("MODEL A")
        .with_floor_area(70.0)
        .with_remaining_lease(70.0);

    let price = estimator.predict(&request).unwrap().price;
    assert!(
        price >= summary.price_min && price <= summary.price_max,
        "{} outside {}..{}",
        price,
        summary.price_min,
        summary.price_max
    );
}

#[test]
fn test_nan_lease_in_csv_is_dropped_before_fit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    let mapping = ColumnMapping::default();
    let mut df = SyntheticHousing::new(21).with_rows(40).to_dataframe(&mapping).unwrap();
    save_csv(&mut df, &path).unwrap();

    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "BEDOK,4 ROOM,04 TO 06,MODEL A,90,NaN,400000").unwrap();
    drop(file);

    let df = DataLoader::new().load(&path).unwrap();
    assert_eq!(df.height(), 41);
    let records = records_from_dataframe(&df, &mapping).unwrap();
    assert_eq!(records[40].attributes.remaining_lease, None);

    let cleaner = DataCleaner::new(CleaningConfig::new());
    let (cleaned, report) = cleaner.clean(records);
    assert_eq!(report.missing_removed, 1);
    assert!(cleaned.iter().all(|r| r.attributes.remaining_lease.is_some_and(f64::is_finite)));

    let mut engine = TrainEngine::new(TrainingConfig::new().with_degree(2));
    engine.fit_dataframe(&df, &mapping, Some(&cleaner)).unwrap();
    let summary = engine.summary().unwrap();
    assert_eq!(summary.train_sample_count + summary.test_sample_count, cleaned.len());
}

#[test]
fn test_nan_record_fails_instead_of_hanging() {
    let mut records = linear_records(30);
    records[7].attributes.remaining_lease = Some(f64::NAN);

    let mut engine = TrainEngine::new(TrainingConfig::new().with_degree(1));
    let result = engine.fit(&records);
    assert!(matches!(result, Err(ValuationError::DataError(_))));

    let mut records = linear_records(30);
    records[2].price = Some(f64::NAN);
    assert!(matches!(engine.fit(&records), Err(ValuationError::DataError(_))));
}

#[test]
fn test_nan_price_is_cleaned_not_fatal() {
    let mut records = SyntheticHousing::new(9).with_rows(40).generate().unwrap();
    records[0].price = Some(f64::NAN);

    let (cleaned, report) = DataCleaner::new(CleaningConfig::default()).clean(records);
    assert_eq!(report.missing_removed, 1);
    assert!(cleaned.len() >= 35);

    let mut engine = TrainEngine::new(TrainingConfig::new().with_degree(2));
    assert!(engine.fit(&cleaned).is_ok());
}

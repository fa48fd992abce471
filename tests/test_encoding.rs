//! Integration test: category encoding and feature building

use resale_valuation::preprocessing::{
    normalize, Attribute, CategoryEncoder, FeatureBuilder, HousingRecord, PropertyAttributes,
    CATEGORICAL_ATTRIBUTES, FEATURE_ORDER,
};
use resale_valuation::ValuationError;

fn record(region: &str, unit: &str, storey: &str, model: &str, area: f64, lease: f64, price: f64) -> HousingRecord {
    HousingRecord::new(
        PropertyAttributes::new()
            .with_region(region)
            .with_unit_type(unit)
            .with_storey_band(storey)
            .with_build_model(model)
            .with_floor_area(area)
            .with_remaining_lease(lease),
        price,
    )
}

fn records() -> Vec<HousingRecord> {
    vec![
        record("TAMPINES", "4 ROOM", "07 TO 09", "MODEL A", 92.0, 70.0, 480_000.0),
        record("bedok", "3 ROOM", "01 TO 03", "improved", 67.0, 55.0, 320_000.0),
        record(" Ang Mo Kio ", "5 ROOM", "10 TO 12", "NEW GENERATION", 110.0, 80.0, 610_000.0),
        record("BEDOK", "4 ROOM", "04 TO 06", "MODEL A", 90.0, 75.0, 450_000.0),
    ]
}

#[test]
fn test_vocabularies_are_sorted_and_normalized() {
    let encoder = CategoryEncoder::fit(&records()).unwrap();

    let regions = encoder.vocabulary(Attribute::Region).unwrap();
    assert_eq!(regions.values(), &["ANG MO KIO", "BEDOK", "TAMPINES"]);

    let models = encoder.vocabulary(Attribute::BuildModel).unwrap();
    assert_eq!(models.values(), &["IMPROVED", "MODEL A", "NEW GENERATION"]);
    assert_eq!(encoder.vocabularies().len(), CATEGORICAL_ATTRIBUTES.len());
}

#[test]
fn test_encode_decode_round_trip() {
    let encoder = CategoryEncoder::fit(&records()).unwrap();

    for &attribute in &CATEGORICAL_ATTRIBUTES {
        let vocab = encoder.vocabulary(attribute).unwrap();
        for (code, value) in vocab.values().iter().enumerate() {
            assert_eq!(encoder.encode(attribute, value).unwrap(), code);
            assert_eq!(encoder.decode(attribute, code).unwrap(), value);
        }
    }
}

#[test]
fn test_encoding_ignores_case_and_whitespace() {
    let encoder = CategoryEncoder::fit(&records()).unwrap();
    let expected = encoder.encode(Attribute::Region, "BEDOK").unwrap();
    assert_eq!(encoder.encode(Attribute::Region, "  bedok ").unwrap(), expected);
    assert_eq!(normalize("  model a "), "MODEL A");
}

#[test]
fn test_codes_independent_of_row_order() {
    let mut reversed = records();
    reversed.reverse();

    let a = CategoryEncoder::fit(&records()).unwrap();
    let b = CategoryEncoder::fit(&reversed).unwrap();
    for &attribute in &CATEGORICAL_ATTRIBUTES {
        assert_eq!(
            a.vocabulary(attribute).unwrap().values(),
            b.vocabulary(attribute).unwrap().values()
        );
    }
}

#[test]
fn test_unknown_category_lists_valid_values() {
    let encoder = CategoryEncoder::fit(&records()).unwrap();
    let err = encoder.encode(Attribute::UnitType, "PENTHOUSE").unwrap_err();

    match &err {
        ValuationError::UnknownCategory { attribute, value, valid } => {
            assert_eq!(attribute, "unit_type");
            assert_eq!(value, "PENTHOUSE");
            assert_eq!(valid, &vec!["3 ROOM".to_string(), "4 ROOM".to_string(), "5 ROOM".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("3 ROOM, 4 ROOM, 5 ROOM"));
}

#[test]
fn test_empty_dataset_rejected() {
    assert!(matches!(CategoryEncoder::fit(&[]), Err(ValuationError::EmptyDataset)));
}

#[test]
fn test_feature_vector_layout() {
    let builder = FeatureBuilder::fit(&records()).unwrap();
    let request = PropertyAttributes::new()
        .with_region("TAMPINES")
        .with_unit_type("5 ROOM")
        .with_storey_band("04 TO 06")
        .with_build_model("IMPROVED")
        .with_floor_area(105.5)
        .with_remaining_lease(66.0);

    let features = builder.build(&request).unwrap();
    assert_eq!(features.as_slice(), &[2.0, 2.0, 1.0, 0.0, 105.5, 66.0]);
    assert_eq!(features.get(Attribute::FloorAreaSqm), 105.5);

    let order: Vec<Attribute> = features.iter().map(|(a, _)| a).collect();
    assert_eq!(order, FEATURE_ORDER.to_vec());
}

#[test]
fn test_feature_builder_reports_missing_attribute() {
    let builder = FeatureBuilder::fit(&records()).unwrap();
    let request = PropertyAttributes::new()
        .with_region("BEDOK")
        .with_unit_type("4 ROOM")
        .with_storey_band("04 TO 06")
        .with_build_model("MODEL A")
        .with_floor_area(90.0);

    let err = builder.build(&request).unwrap_err();
    assert!(matches!(err, ValuationError::MissingAttribute(ref key) if key == "remaining_lease"));
}

#[test]
fn test_build_matrix_shape() {
    let builder = FeatureBuilder::fit(&records()).unwrap();
    let x = builder.build_matrix(&records()).unwrap();
    assert_eq!(x.dim(), (4, 6));
    // " Ang Mo Kio " encodes to the first region
    assert_eq!(x[[2, 0]], 0.0);
}

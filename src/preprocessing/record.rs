//! Housing record data model
//!
//! A record carries four categorical attributes, two numeric attributes and an
//! optional resale price label. Every attribute is optional so that absent
//! values can be reported instead of silently defaulted.

use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-label attributes of a housing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Region,
    UnitType,
    StoreyBand,
    BuildModel,
    FloorAreaSqm,
    RemainingLease,
}

/// Feature order shared by training and inference
pub const FEATURE_ORDER: [Attribute; 6] = [
    Attribute::Region,
    Attribute::UnitType,
    Attribute::StoreyBand,
    Attribute::BuildModel,
    Attribute::FloorAreaSqm,
    Attribute::RemainingLease,
];

/// Attributes that are label-encoded before modelling
pub const CATEGORICAL_ATTRIBUTES: [Attribute; 4] = [
    Attribute::Region,
    Attribute::UnitType,
    Attribute::StoreyBand,
    Attribute::BuildModel,
];

/// Number of raw features fed to the regression engine
pub const N_FEATURES: usize = FEATURE_ORDER.len();

impl Attribute {
    /// Stable snake_case key
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Region => "region",
            Attribute::UnitType => "unit_type",
            Attribute::StoreyBand => "storey_band",
            Attribute::BuildModel => "build_model",
            Attribute::FloorAreaSqm => "floor_area_sqm",
            Attribute::RemainingLease => "remaining_lease",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Region => "Region",
            Attribute::UnitType => "Unit Type",
            Attribute::StoreyBand => "Storey Band",
            Attribute::BuildModel => "Build Model",
            Attribute::FloorAreaSqm => "Floor Area Sqm",
            Attribute::RemainingLease => "Remaining Lease",
        }
    }

    /// Column position in [`FEATURE_ORDER`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_categorical(&self) -> bool {
        CATEGORICAL_ATTRIBUTES.contains(self)
    }

    /// Parse a key, accepting `-` or space in place of `_`
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace(['-', ' '], "_");
        FEATURE_ORDER.iter().copied().find(|a| a.key() == normalized)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw attributes of one property, as entered by a user or read from a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyAttributes {
    pub region: Option<String>,
    pub unit_type: Option<String>,
    pub storey_band: Option<String>,
    pub build_model: Option<String>,
    pub floor_area_sqm: Option<f64>,
    pub remaining_lease: Option<f64>,
}

impl PropertyAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(value.into());
        self
    }

    pub fn with_unit_type(mut self, value: impl Into<String>) -> Self {
        self.unit_type = Some(value.into());
        self
    }

    pub fn with_storey_band(mut self, value: impl Into<String>) -> Self {
        self.storey_band = Some(value.into());
        self
    }

    pub fn with_build_model(mut self, value: impl Into<String>) -> Self {
        self.build_model = Some(value.into());
        self
    }

    pub fn with_floor_area(mut self, sqm: f64) -> Self {
        self.floor_area_sqm = Some(sqm);
        self
    }

    pub fn with_remaining_lease(mut self, years: f64) -> Self {
        self.remaining_lease = Some(years);
        self
    }

    /// Build from `(key, value)` string pairs.
    ///
    /// Unknown keys and unparseable numbers are rejected. Keys that never
    /// appear stay unset and surface later as [`ValuationError::MissingAttribute`].
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attrs = Self::new();
        for (key, value) in pairs {
            let attribute = Attribute::from_key(key)
                .ok_or_else(|| ValuationError::InvalidInput(format!("unexpected attribute '{}'", key)))?;
            if attribute.is_categorical() {
                attrs.set_category(attribute, value.to_string());
            } else {
                let number: f64 = value.trim().parse().map_err(|_| {
                    ValuationError::InvalidInput(format!("{} must be numeric, got '{}'", attribute, value))
                })?;
                attrs.set_numeric(attribute, number);
            }
        }
        Ok(attrs)
    }

    /// Categorical value for `attribute`, `None` for numeric attributes
    pub fn category(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Region => self.region.as_deref(),
            Attribute::UnitType => self.unit_type.as_deref(),
            Attribute::StoreyBand => self.storey_band.as_deref(),
            Attribute::BuildModel => self.build_model.as_deref(),
            Attribute::FloorAreaSqm | Attribute::RemainingLease => None,
        }
    }

    /// Numeric value for `attribute`, `None` for categorical attributes
    pub fn numeric(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::FloorAreaSqm => self.floor_area_sqm,
            Attribute::RemainingLease => self.remaining_lease,
            _ => None,
        }
    }

    pub fn set_category(&mut self, attribute: Attribute, value: String) {
        match attribute {
            Attribute::Region => self.region = Some(value),
            Attribute::UnitType => self.unit_type = Some(value),
            Attribute::StoreyBand => self.storey_band = Some(value),
            Attribute::BuildModel => self.build_model = Some(value),
            Attribute::FloorAreaSqm | Attribute::RemainingLease => {}
        }
    }

    pub fn set_numeric(&mut self, attribute: Attribute, value: f64) {
        match attribute {
            Attribute::FloorAreaSqm => self.floor_area_sqm = Some(value),
            Attribute::RemainingLease => self.remaining_lease = Some(value),
            _ => {}
        }
    }

    /// First attribute in feature order that has no value
    pub fn first_missing(&self) -> Option<Attribute> {
        FEATURE_ORDER.iter().copied().find(|&a| {
            if a.is_categorical() {
                self.category(a).is_none()
            } else {
                self.numeric(a).is_none()
            }
        })
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }
}

/// One historical resale transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    pub attributes: PropertyAttributes,
    pub price: Option<f64>,
}

impl HousingRecord {
    pub fn new(attributes: PropertyAttributes, price: f64) -> Self {
        Self {
            attributes,
            price: Some(price),
        }
    }
}

//! Categorical label encoding
//!
//! Each categorical attribute gets a frozen [`Vocabulary`]: the distinct
//! normalized values seen at fit time, sorted, with codes equal to their
//! position. There is no way to add values after fitting.

use super::record::{Attribute, HousingRecord, CATEGORICAL_ATTRIBUTES};
use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical form of a categorical value: trimmed and upper-cased
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Sorted, immutable set of category values for one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    attribute: Attribute,
    values: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from observed values, in any order
    pub fn fit<I, S>(attribute: Attribute, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = values.into_iter().map(|v| normalize(v.as_ref())).collect();
        if distinct.is_empty() {
            return Err(ValuationError::EmptyDataset);
        }

        Ok(Self {
            attribute,
            values: distinct.into_iter().collect(),
        })
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Code for `value`, after normalization
    pub fn encode(&self, value: &str) -> Result<usize> {
        let key = normalize(value);
        self.values
            .binary_search(&key)
            .map_err(|_| ValuationError::UnknownCategory {
                attribute: self.attribute.key().to_string(),
                value: key,
                valid: self.values.clone(),
            })
    }

    /// Value for `code`
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.values
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| ValuationError::InvalidParameter {
                name: self.attribute.key().to_string(),
                value: code.to_string(),
                reason: format!("code must be below {}", self.values.len()),
            })
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.binary_search(&normalize(value)).is_ok()
    }

    /// Sorted values, suitable for presenting as choices
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Label encoder over every categorical attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    vocabularies: Vec<Vocabulary>,
}

impl CategoryEncoder {
    /// Fit one vocabulary per categorical attribute
    pub fn fit(records: &[HousingRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(ValuationError::EmptyDataset);
        }

        let vocabularies = CATEGORICAL_ATTRIBUTES
            .iter()
            .map(|&attribute| {
                let values = records
                    .iter()
                    .map(|r| {
                        r.attributes
                            .category(attribute)
                            .ok_or_else(|| ValuationError::MissingAttribute(attribute.key().to_string()))
                    })
                    .collect::<Result<Vec<&str>>>()?;
                Vocabulary::fit(attribute, values)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { vocabularies })
    }

    /// Vocabulary for a categorical attribute
    pub fn vocabulary(&self, attribute: Attribute) -> Result<&Vocabulary> {
        self.vocabularies
            .iter()
            .find(|v| v.attribute == attribute)
            .ok_or_else(|| ValuationError::FeatureNotFound(attribute.key().to_string()))
    }

    pub fn encode(&self, attribute: Attribute, value: &str) -> Result<usize> {
        self.vocabulary(attribute)?.encode(value)
    }

    pub fn decode(&self, attribute: Attribute, code: usize) -> Result<&str> {
        self.vocabulary(attribute)?.decode(code)
    }

    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }
}

//! In-memory prediction history for one session

use crate::preprocessing::PropertyAttributes;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One recorded prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub request: PropertyAttributes,
    pub price: f64,
    pub timestamp: DateTime<Local>,
}

/// Predictions made during the current process, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionHistory {
    entries: Vec<HistoryEntry>,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a prediction stamped with the current local time
    pub fn record(&mut self, request: PropertyAttributes, price: f64) -> &HistoryEntry {
        self.push(HistoryEntry {
            request,
            price,
            timestamp: Local::now(),
        })
    }

    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Handler result shapes and search constraints

use serde::{Deserialize, Serialize};

use webpilot_core_types::{ExtractionDiagnostic, ExtractionRecord, FieldValue};

/// Caller-side constraints applied to handler search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConstraints {
    /// Record cap after filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Keep only records whose rating is at least this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,

    /// Keep only records whose price is at most this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl SearchConstraints {
    /// Filter and truncate records in place
    pub fn apply(&self, records: &mut Vec<ExtractionRecord>) {
        if let Some(min_rating) = self.min_rating {
            records.retain(|record| {
                record
                    .get("rating")
                    .and_then(FieldValue::as_number)
                    .map(|rating| rating >= min_rating)
                    // Records without a parsed rating stay; filtering is
                    // best-effort, not a guarantee of completeness.
                    .unwrap_or(true)
            });
        }
        if let Some(max_price) = self.max_price {
            records.retain(|record| {
                record
                    .get("price")
                    .and_then(FieldValue::as_number)
                    .map(|price| price <= max_price)
                    .unwrap_or(true)
            });
        }
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
    }
}

/// What a handler returns: data plus enough diagnostics to debug a miss
#[derive(Debug, Clone, Default)]
pub struct HandlerReport {
    pub records: Vec<ExtractionRecord>,

    /// Count of records after filtering
    pub count: usize,

    pub diagnostic: ExtractionDiagnostic,
}

impl HandlerReport {
    pub fn from_records(records: Vec<ExtractionRecord>, diagnostic: ExtractionDiagnostic) -> Self {
        let count = records.len();
        Self {
            records,
            count,
            diagnostic,
        }
    }

    /// Best-effort empty report carrying only diagnostics
    pub fn empty(diagnostic: ExtractionDiagnostic) -> Self {
        Self {
            records: Vec::new(),
            count: 0,
            diagnostic,
        }
    }
}

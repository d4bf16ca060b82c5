//! Extraction schema, normalized values, and record batches

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One field the caller wants extracted from each result container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name in the produced records (e.g. `name`, `price`, `url`)
    pub name: String,

    /// Primary selector; the engine augments it with site alternates
    pub selector: String,
}

/// Ordered field-name → primary-selector mapping for one Extract action
///
/// Field order is preserved so the produced records keep a stable layout.
/// Consumed once per `Extract` action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    pub fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style field registration; a repeated name replaces the
    /// earlier selector.
    pub fn with_field(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        let name = name.into();
        let selector = selector.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.selector = selector;
        } else {
            self.fields.push(FieldSpec { name, selector });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn selector_for(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.selector.as_str())
    }
}

/// A normalized field value
///
/// Serializes untagged so records read naturally as JSON objects
/// (`"price": 125999.0`, `"rating": null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One structured result row
///
/// Invariant: the key set equals the schema's field names, every field
/// present, `Null` where normalization produced nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    #[serde(flatten)]
    pub values: BTreeMap<String, FieldValue>,
}

impl ExtractionRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Count of non-null values in this record
    pub fn populated(&self) -> usize {
        self.values.values().filter(|v| !v.is_null()).count()
    }
}

/// Selector hit counts and notes captured while extracting
///
/// Returned with every extraction, including empty ones: absence of data is
/// not a failure in this domain, but the caller needs enough signal to tell
/// "page had nothing" from "selectors all missed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionDiagnostic {
    /// Container selector that matched, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_selector: Option<String>,

    /// Containers discovered before the limit was applied
    pub containers_found: usize,

    /// Containers dropped for having neither a name nor a link
    pub containers_dropped: usize,

    /// Per-selector hit counts across all tried selectors
    pub selector_hits: BTreeMap<String, usize>,

    /// Free-form notes (heuristic fallback engaged, truncation, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder_dedupes_names() {
        let schema = ExtractionSchema::new()
            .with_field("name", "h3")
            .with_field("price", ".price")
            .with_field("name", "h2");
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.selector_for("name"), Some("h2"));
        assert_eq!(schema.field_names(), vec!["name", "price"]);
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let mut record = ExtractionRecord::default();
        record
            .values
            .insert("price".to_string(), FieldValue::Number(12.5));
        record.values.insert("rating".to_string(), FieldValue::Null);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["price"], 12.5);
        assert!(json["rating"].is_null());
    }

    #[test]
    fn test_populated_counts_non_null() {
        let mut record = ExtractionRecord::default();
        record
            .values
            .insert("name".to_string(), FieldValue::Text("Widget".into()));
        record.values.insert("price".to_string(), FieldValue::Null);
        assert_eq!(record.populated(), 1);
    }
}

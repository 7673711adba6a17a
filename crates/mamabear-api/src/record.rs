//! Inventory record types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value produced by a single fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    /// Single string value (model id, serial number, ...)
    Text(String),
    /// Sequence of strings (user names, ...)
    List(Vec<String>),
}

impl FactValue {
    /// Empty text value, used for degraded and placeholder facts
    #[must_use]
    pub fn empty() -> Self {
        FactValue::Text(String::new())
    }

    /// Check if the value carries no data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FactValue::Text(s) => s.is_empty(),
            FactValue::List(items) => items.is_empty(),
        }
    }

    /// Borrow the text value, if this is a text fact
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            FactValue::List(_) => None,
        }
    }

    /// Borrow the list value, if this is a list fact
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FactValue::Text(_) => None,
            FactValue::List(items) => Some(items),
        }
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for FactValue {
    fn from(value: Vec<String>) -> Self {
        FactValue::List(value)
    }
}

/// Collected host facts keyed by fact name
///
/// Serializes as a flat JSON object, which is the request body sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryRecord {
    facts: BTreeMap<String, FactValue>,
}

impl InventoryRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fact, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FactValue>) {
        self.facts.insert(name.into(), value.into());
    }

    /// Look up a fact by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FactValue> {
        self.facts.get(name)
    }

    /// Number of facts
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if no facts were stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_flat() {
        let mut record = InventoryRecord::new();
        record.insert("serial_number", "C02XYZ");
        record.insert("users", vec!["alice".to_string(), "bob".to_string()]);
        record.insert("osx_screensaver", FactValue::empty());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "serial_number": "C02XYZ",
                "users": ["alice", "bob"],
                "osx_screensaver": "",
            })
        );
    }

    #[test]
    fn test_insert_replaces() {
        let mut record = InventoryRecord::new();
        record.insert("model_id", "first");
        record.insert("model_id", "second");

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("model_id").and_then(FactValue::as_text), Some("second"));
    }

    #[test]
    fn test_empty_values() {
        assert!(FactValue::empty().is_empty());
        assert!(FactValue::List(Vec::new()).is_empty());
        assert!(!FactValue::from("x").is_empty());
    }
}

//! The unit of data passed from inputs to outputs.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("metric name must not be empty")]
    EmptyName,

    #[error("metric {0} has no fields")]
    NoFields(String),
}

/// A single field value. Serializes as the bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

/// Tags and fields are kept in sorted maps so serialized output is stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn new(
        name: impl Into<String>,
        tags: &HashMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, MetricError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MetricError::EmptyName);
        }
        if fields.is_empty() {
            return Err(MetricError::NoFields(name));
        }

        Ok(Self {
            name,
            tags: tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            fields,
            timestamp,
        })
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Add a tag unless one with the same key is already present.
    pub fn add_tag_if_absent(&mut self, key: &str, value: &str) {
        self.tags
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_field() -> BTreeMap<String, FieldValue> {
        BTreeMap::from([("value".to_string(), FieldValue::Integer(1))])
    }

    #[test]
    fn test_metric_new_rejects_empty_name() {
        let err = Metric::new("", &HashMap::new(), one_field(), Utc::now()).unwrap_err();
        assert_eq!(err, MetricError::EmptyName);
    }

    #[test]
    fn test_metric_new_rejects_no_fields() {
        let err = Metric::new("cpu", &HashMap::new(), BTreeMap::new(), Utc::now()).unwrap_err();
        assert_eq!(err, MetricError::NoFields("cpu".to_string()));
    }

    #[test]
    fn test_metric_copies_tags() {
        let tags = HashMap::from([("dc".to_string(), "us-east".to_string())]);
        let m = Metric::new("cpu", &tags, one_field(), Utc::now()).unwrap();
        assert_eq!(m.tag("dc"), Some("us-east"));
        assert_eq!(m.field("value"), Some(&FieldValue::Integer(1)));
    }

    #[test]
    fn test_add_tag_if_absent_keeps_existing() {
        let tags = HashMap::from([("host".to_string(), "a".to_string())]);
        let mut m = Metric::new("cpu", &tags, one_field(), Utc::now()).unwrap();
        m.add_tag_if_absent("host", "b");
        m.add_tag_if_absent("rack", "1a");
        assert_eq!(m.tag("host"), Some("a"));
        assert_eq!(m.tag("rack"), Some("1a"));
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let json = serde_json::to_value(FieldValue::Float(23.5)).unwrap();
        assert_eq!(json, serde_json::json!(23.5));
        let json = serde_json::to_value(FieldValue::Boolean(true)).unwrap();
        assert_eq!(json, serde_json::json!(true));
    }
}

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use crate::metric::FieldValue;
use crate::parser::traits::*;
use crate::parser::DataType;

/// Name of the single field every value metric carries.
pub const VALUE_FIELD: &str = "value";

/// Parser for payloads holding one scalar value, e.g. the contents of a
/// sysfs file or the output of a command that prints a single number.
#[derive(Debug, Clone)]
pub struct ValueParser {
    pub metric_name: String,
    pub data_type: DataType,
    pub default_tags: HashMap<String, String>,
}

impl ValueParser {
    pub fn new(
        metric_name: impl Into<String>,
        data_type: DataType,
        default_tags: HashMap<String, String>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            data_type,
            default_tags,
        }
    }

    fn convert(&self, text: &str) -> Result<FieldValue, ParseError> {
        let invalid = |reason: String| ParseError::InvalidValue {
            data_type: self.data_type,
            text: text.to_string(),
            reason,
        };

        match self.data_type {
            DataType::Integer => text
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| invalid(e.to_string())),
            DataType::Float => text
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|e| invalid(e.to_string())),
            DataType::Boolean => parse_bool(text)
                .map(FieldValue::Boolean)
                .ok_or_else(|| invalid("invalid boolean".to_string())),
            DataType::String => Ok(FieldValue::String(text.to_string())),
        }
    }
}

impl MetricParser for ValueParser {
    fn parse(&self, buf: &[u8]) -> Result<Vec<Metric>, ParseError> {
        let raw = String::from_utf8_lossy(buf);
        let trimmed = raw.trim_matches('\0').trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        // Anything but a string keeps only the last whitespace-separated
        // token, so "Temp: 23.5" yields 23.5.
        let token = match self.data_type {
            DataType::String => trimmed,
            _ => trimmed.split_whitespace().last().unwrap_or(trimmed),
        };

        let value = self.convert(token)?;
        let fields = BTreeMap::from([(VALUE_FIELD.to_string(), value)]);
        let metric = Metric::new(&self.metric_name, &self.default_tags, fields, Utc::now())?;

        Ok(vec![metric])
    }

    fn parse_line(&self, line: &str) -> Result<Metric, ParseError> {
        self.parse(line.as_bytes())?
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::NoMetricParsed(line.to_string()))
    }

    fn set_default_tags(&mut self, tags: HashMap<String, String>) {
        self.default_tags = tags;
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::metric::MetricError;

/// Declared type of a scalar payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum DataType {
    #[default]
    Integer,
    Float,
    String,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "int" | "integer" => Ok(DataType::Integer),
            "float" | "long" => Ok(DataType::Float),
            "str" | "string" => Ok(DataType::String),
            "bool" | "boolean" => Ok(DataType::Boolean),
            other => Err(ParseError::UnknownDataType(other.to_string())),
        }
    }
}

impl TryFrom<String> for DataType {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot convert {text:?} to {data_type}: {reason}")]
    InvalidValue {
        data_type: DataType,
        text: String,
        reason: String,
    },

    #[error("Can not parse the line: {0}, for data format: value")]
    NoMetricParsed(String),

    #[error("unknown data type: {0:?}")]
    UnknownDataType(String),

    #[error(transparent)]
    Metric(#[from] MetricError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_aliases() {
        assert_eq!("".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("long".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("str".parse::<DataType>().unwrap(), DataType::String);
        assert_eq!("bool".parse::<DataType>().unwrap(), DataType::Boolean);
    }

    #[test]
    fn test_data_type_unknown() {
        let err = "decimal".parse::<DataType>().unwrap_err();
        assert!(matches!(err, ParseError::UnknownDataType(ref s) if s == "decimal"));
    }

    #[test]
    fn test_data_type_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            data_type: DataType,
        }
        let section: Section = toml::from_str(r#"data_type = "boolean""#).unwrap();
        assert_eq!(section.data_type, DataType::Boolean);

        let bad = toml::from_str::<Section>(r#"data_type = "decimal""#);
        assert!(bad.is_err());
    }
}

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::metric::Metric;
use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Other(String),
}

/// The part of a plugin that documents itself.
pub trait Printer {
    /// one-sentence description of the plugin
    fn description(&self) -> &str;

    /// commented TOML body showing the plugin's settings
    fn sample_config(&self) -> &str;
}

/// A data source.
pub trait Input: Printer + Send {
    /// Apply the plugin's own table from the config file.
    fn configure(&mut self, _table: toml::Table) -> Result<(), toml::de::Error> {
        Ok(())
    }

    /// Collect one round of metrics.
    fn gather(&mut self) -> Result<Vec<Metric>, PluginError>;
}

/// A data sink.
pub trait Output: Printer + Send {
    /// Apply the plugin's own table from the config file.
    fn configure(&mut self, _table: toml::Table) -> Result<(), toml::de::Error> {
        Ok(())
    }

    /// Connect to the output.
    fn connect(&mut self) -> Result<(), PluginError>;

    /// Close any connections to the output.
    fn close(&mut self) -> Result<(), PluginError>;

    /// Write a batch of metrics.
    fn write(&mut self, metrics: &[Metric]) -> Result<(), PluginError>;
}

/// Deserialize a plugin table into its settings struct.
pub fn decode<T: DeserializeOwned>(table: toml::Table) -> Result<T, toml::de::Error> {
    toml::Value::Table(table).try_into()
}

use std::collections::HashMap;

use serde::Deserialize;

use crate::metric::Metric;
use crate::parser::{DataType, MetricParser, ValueParser};
use crate::plugin::traits::{decode, Input, PluginError, Printer};

const SAMPLE_CONFIG: &str = r#"
  ## Files to read; each file holds a single value.
  files = ["/sys/class/thermal/thermal_zone0/temp"]

  ## Type of the value: "integer", "float", "string" or "boolean".
  data_type = "integer"

  ## Metric name, defaults to "file".
  # name = "file"
"#;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    files: Vec<String>,
    data_type: DataType,
    name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            data_type: DataType::Integer,
            name: "file".to_string(),
        }
    }
}

/// Input reading scalar values from files, one metric per file.
#[derive(Debug)]
pub struct File {
    files: Vec<String>,
    parser: ValueParser,
}

pub fn new() -> Box<dyn Input> {
    Box::new(File::default())
}

impl Default for File {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            files: settings.files,
            parser: ValueParser::new(settings.name, settings.data_type, HashMap::new()),
        }
    }
}

impl Printer for File {
    fn description(&self) -> &str {
        "Read single values from files"
    }

    fn sample_config(&self) -> &str {
        SAMPLE_CONFIG
    }
}

impl Input for File {
    fn configure(&mut self, table: toml::Table) -> Result<(), toml::de::Error> {
        let settings: Settings = decode(table)?;
        self.files = settings.files;
        self.parser = ValueParser::new(settings.name, settings.data_type, HashMap::new());
        Ok(())
    }

    fn gather(&mut self) -> Result<Vec<Metric>, PluginError> {
        let mut metrics = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let contents = std::fs::read(path)?;
            let mut parsed = self.parser.parse(&contents)?;
            for metric in &mut parsed {
                metric.add_tag_if_absent("file", path);
            }
            metrics.extend(parsed);
        }
        Ok(metrics)
    }
}

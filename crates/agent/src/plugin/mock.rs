//! Test doubles shared by the plugin and conf tests.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::Deserialize;

use crate::metric::{FieldValue, Metric};
use super::registry::PluginRegistry;
use super::traits::{decode, Input, Output, PluginError, Printer};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiskSettings {
    #[serde(default)]
    mount_points: Vec<String>,
}

#[derive(Debug)]
pub struct MockInput {
    description: String,
    sample: &'static str,
    pub mount_points: Vec<String>,
}

impl MockInput {
    pub const DESCRIPTION: &'static str = "Read metrics about disk usage by mount point";

    pub fn with_description(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self {
            description: Self::DESCRIPTION.to_string(),
            sample: "\n  ## Mount points to report\n  mount_points = [\"/\"]\n",
            mount_points: Vec::new(),
        }
    }
}

impl Printer for MockInput {
    fn description(&self) -> &str {
        &self.description
    }

    fn sample_config(&self) -> &str {
        self.sample
    }
}

impl Input for MockInput {
    fn configure(&mut self, table: toml::Table) -> Result<(), toml::de::Error> {
        let settings: DiskSettings = decode(table)?;
        self.mount_points = settings.mount_points;
        Ok(())
    }

    fn gather(&mut self) -> Result<Vec<Metric>, PluginError> {
        let fields = BTreeMap::from([(
            "mounts".to_string(),
            FieldValue::Integer(self.mount_points.len() as i64),
        )]);
        let metric = Metric::new("disk", &HashMap::new(), fields, Utc::now())
            .map_err(|e| PluginError::Other(e.to_string()))?;
        Ok(vec![metric])
    }
}

#[derive(Debug, Default)]
pub struct MockOutput {
    pub written: usize,
}

impl Printer for MockOutput {
    fn description(&self) -> &str {
        "Collect metrics in memory"
    }

    fn sample_config(&self) -> &str {
        ""
    }
}

impl Output for MockOutput {
    fn connect(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    fn write(&mut self, metrics: &[Metric]) -> Result<(), PluginError> {
        self.written += metrics.len();
        Ok(())
    }
}

pub fn disk() -> Box<dyn Input> {
    Box::new(MockInput::default())
}

pub fn net() -> Box<dyn Input> {
    Box::new(MockInput {
        description: "Read metrics about network interfaces".to_string(),
        sample: "",
        mount_points: Vec::new(),
    })
}

pub fn sink() -> Box<dyn Output> {
    Box::new(MockOutput::default())
}

/// Registry with inputs `disk` and `net` and output `sink`.
pub fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_input("disk", disk);
    registry.register_input("net", net);
    registry.register_output("sink", sink);
    registry
}

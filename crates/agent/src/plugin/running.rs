//! Configured plugin instances as held by a loaded config.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::conf::duration::deserialize_optional;
use crate::conf::Duration;
use crate::metric::Metric;
use super::traits::{decode, Input, Output, PluginError};

/// Keys every input table may carry in addition to its own settings.
const COMMON_INPUT_KEYS: [&str; 5] = ["interval", "name_override", "name_prefix", "name_suffix", "tags"];

/// Settings shared by all inputs, stripped from the plugin table before the
/// plugin sees it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputConfig {
    #[serde(skip)]
    pub name: String,
    /// Unset when absent or unparseable; the agent interval applies.
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub interval: Option<Duration>,
    pub name_override: Option<String>,
    pub name_prefix: Option<String>,
    pub name_suffix: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl InputConfig {
    /// Remove the common keys from `table` and decode them.
    pub fn extract(name: &str, table: &mut toml::Table) -> Result<Self, toml::de::Error> {
        let mut common = toml::Table::new();
        for key in COMMON_INPUT_KEYS {
            if let Some(value) = table.remove(key) {
                common.insert(key.to_string(), value);
            }
        }

        let mut config: InputConfig = decode(common)?;
        config.name = name.to_string();
        Ok(config)
    }

    /// Metric name after override, prefix and suffix are applied.
    pub fn metric_name(&self, name: &str) -> String {
        let base = self.name_override.as_deref().unwrap_or(name);
        format!(
            "{}{}{}",
            self.name_prefix.as_deref().unwrap_or(""),
            base,
            self.name_suffix.as_deref().unwrap_or("")
        )
    }
}

pub struct RunningInput {
    pub config: InputConfig,
    pub input: Box<dyn Input>,
}

impl RunningInput {
    pub fn new(input: Box<dyn Input>, config: InputConfig) -> Self {
        Self { config, input }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Gather once and decorate the metrics with this instance's name
    /// changes and tags.
    pub fn gather(&mut self) -> Result<Vec<Metric>, PluginError> {
        let mut metrics = self.input.gather()?;
        for metric in &mut metrics {
            metric.name = self.config.metric_name(&metric.name);
            for (k, v) in &self.config.tags {
                metric.add_tag_if_absent(k, v);
            }
        }
        Ok(metrics)
    }
}

impl fmt::Debug for RunningInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningInput")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub struct RunningOutput {
    pub name: String,
    pub output: Box<dyn Output>,
}

impl RunningOutput {
    pub fn new(name: impl Into<String>, output: Box<dyn Output>) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for RunningOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningOutput")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::mock;

    fn table(text: &str) -> toml::Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_extract_strips_common_keys() {
        let mut t = table(
            r#"
            interval = "30s"
            name_override = "rootfs"
            mount_points = ["/"]
            [tags]
            role = "db"
            "#,
        );
        let config = InputConfig::extract("disk", &mut t).unwrap();
        assert_eq!(config.name, "disk");
        assert_eq!(config.interval, Some(Duration::from_secs(30)));
        assert_eq!(config.name_override.as_deref(), Some("rootfs"));
        assert_eq!(config.tags.get("role").map(String::as_str), Some("db"));
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["mount_points"]);
    }

    #[test]
    fn test_extract_bad_interval_stays_unset() {
        let mut t = table(r#"interval = "whenever""#);
        let config = InputConfig::extract("disk", &mut t).unwrap();
        assert_eq!(config.interval, None);
        assert!(t.is_empty());
    }

    #[test]
    fn test_extract_rejects_bad_tags() {
        let mut t = table("tags = 5");
        assert!(InputConfig::extract("disk", &mut t).is_err());
    }

    #[test]
    fn test_metric_name_composition() {
        let config = InputConfig {
            name_prefix: Some("host_".into()),
            name_suffix: Some("_total".into()),
            ..Default::default()
        };
        assert_eq!(config.metric_name("disk"), "host_disk_total");

        let config = InputConfig {
            name_override: Some("rootfs".into()),
            ..Default::default()
        };
        assert_eq!(config.metric_name("disk"), "rootfs");
    }

    #[test]
    fn test_running_input_decorates_metrics() {
        let config = InputConfig {
            name: "disk".into(),
            name_prefix: Some("sys_".into()),
            tags: HashMap::from([("role".to_string(), "db".to_string())]),
            ..Default::default()
        };
        let mut running = RunningInput::new(mock::disk(), config);
        let metrics = running.gather().unwrap();
        assert_eq!(running.name(), "disk");
        assert_eq!(metrics[0].name, "sys_disk");
        assert_eq!(metrics[0].tag("role"), Some("db"));
    }
}

//! Config, AgentSettings and their views.

use std::collections::HashMap;

use serde::Deserialize;

use super::duration::Duration;
use crate::plugin::{RunningInput, RunningOutput};

/// Agent-wide settings from the `[agent]` table.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Default data collection interval for all inputs
    pub interval: Duration,
    /// Round collection to multiples of `interval`
    pub round_interval: bool,
    pub metric_batch_size: usize,
    pub metric_buffer_limit: usize,
    pub collection_jitter: Duration,
    pub flush_interval: Duration,
    pub flush_jitter: Duration,
    /// Timestamp precision; zero means derive it from `interval`
    pub precision: Duration,
    pub debug: bool,
    pub quiet: bool,
    /// Log file path; empty means stderr
    pub logfile: String,
    /// Hostname override; empty means ask the OS
    pub hostname: String,
    pub omit_hostname: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            round_interval: true,
            metric_batch_size: 1000,
            metric_buffer_limit: 10_000,
            collection_jitter: Duration::default(),
            flush_interval: Duration::from_secs(10),
            flush_jitter: Duration::default(),
            precision: Duration::default(),
            debug: false,
            quiet: false,
            logfile: String::new(),
            hostname: String::new(),
            omit_hostname: false,
        }
    }
}

/// Keys present in one `[agent]` table. Durations stay raw so a value that
/// fails to parse can leave the current setting untouched.
#[derive(Debug, Default, Deserialize)]
struct AgentTable {
    interval: Option<toml::Value>,
    round_interval: Option<bool>,
    metric_batch_size: Option<usize>,
    metric_buffer_limit: Option<usize>,
    collection_jitter: Option<toml::Value>,
    flush_interval: Option<toml::Value>,
    flush_jitter: Option<toml::Value>,
    precision: Option<toml::Value>,
    debug: Option<bool>,
    quiet: Option<bool>,
    logfile: Option<String>,
    hostname: Option<String>,
    omit_hostname: Option<bool>,
}

fn apply_duration(target: &mut Duration, value: Option<toml::Value>) {
    if let Some(value) = value {
        let _ = target.apply_value(&value);
    }
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl AgentSettings {
    /// Overwrite the settings named in `table`; other settings keep their
    /// current values and unknown keys are ignored.
    pub fn apply_table(&mut self, table: toml::Table) -> Result<(), toml::de::Error> {
        let t: AgentTable = toml::Value::Table(table).try_into()?;

        apply_duration(&mut self.interval, t.interval);
        apply(&mut self.round_interval, t.round_interval);
        apply(&mut self.metric_batch_size, t.metric_batch_size);
        apply(&mut self.metric_buffer_limit, t.metric_buffer_limit);
        apply_duration(&mut self.collection_jitter, t.collection_jitter);
        apply_duration(&mut self.flush_interval, t.flush_interval);
        apply_duration(&mut self.flush_jitter, t.flush_jitter);
        apply_duration(&mut self.precision, t.precision);
        apply(&mut self.debug, t.debug);
        apply(&mut self.quiet, t.quiet);
        apply(&mut self.logfile, t.logfile);
        apply(&mut self.hostname, t.hostname);
        apply(&mut self.omit_hostname, t.omit_hostname);
        Ok(())
    }

    /// The configured hostname, or the machine's when none is set.
    pub fn resolved_hostname(&self) -> String {
        if !self.hostname.is_empty() {
            return self.hostname.clone();
        }
        std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.is_empty())
            .or_else(|| {
                std::fs::read_to_string("/proc/sys/kernel/hostname")
                    .ok()
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
            })
            .unwrap_or_else(|| "localhost".to_string())
    }
}

/// Everything loaded from the configuration file(s).
#[derive(Debug, Default)]
pub struct Config {
    pub tags: HashMap<String, String>,
    pub agent: AgentSettings,
    /// Only inputs named here are created; empty means all.
    pub input_filters: Vec<String>,
    /// Only outputs named here are created; empty means all.
    pub output_filters: Vec<String>,
    pub inputs: Vec<RunningInput>,
    pub outputs: Vec<RunningOutput>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the configured inputs, in load order.
    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(RunningInput::name).collect()
    }

    /// Names of the configured outputs, in load order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(RunningOutput::name).collect()
    }

    /// Global tags as `key=value` pairs sorted by key, space separated.
    pub fn list_tags(&self) -> String {
        let mut tags: Vec<String> = self
            .tags
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        tags.sort();
        tags.join(" ")
    }

    /// Add the `host` tag unless disabled or already set.
    pub fn apply_host_tag(&mut self) {
        if self.agent.omit_hostname || self.tags.contains_key("host") {
            return;
        }
        let host = self.agent.resolved_hostname();
        self.tags.insert("host".to_string(), host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_table(text: &str) -> toml::Table {
        toml::from_str(text).expect("Should parse agent table")
    }

    // ── AgentSettings Defaults ───────────────────────────────────

    #[test]
    fn test_agent_settings_defaults() {
        let agent = AgentSettings::default();
        assert_eq!(agent.interval, Duration::from_secs(10));
        assert!(agent.round_interval);
        assert_eq!(agent.metric_batch_size, 1000);
        assert_eq!(agent.metric_buffer_limit, 10_000);
        assert_eq!(agent.flush_interval, Duration::from_secs(10));
        assert!(agent.logfile.is_empty());
        assert!(agent.hostname.is_empty());
        assert!(!agent.omit_hostname);
    }

    // ── Applying tables ──────────────────────────────────────────

    #[test]
    fn test_apply_only_present_keys() {
        let mut agent = AgentSettings::default();
        agent
            .apply_table(agent_table(r#"hostname = "edge-1""#))
            .unwrap();
        agent
            .apply_table(agent_table(r#"interval = "15s""#))
            .unwrap();
        assert_eq!(agent.hostname, "edge-1");
        assert_eq!(agent.interval, Duration::from_secs(15));
        assert_eq!(agent.metric_batch_size, 1000);
    }

    #[test]
    fn test_apply_bad_duration_keeps_previous() {
        let mut agent = AgentSettings::default();
        agent
            .apply_table(agent_table(r#"flush_interval = "whenever""#))
            .unwrap();
        assert_eq!(agent.flush_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_apply_ignores_unknown_keys() {
        let mut agent = AgentSettings::default();
        agent
            .apply_table(agent_table("utc = true\nquiet = true"))
            .unwrap();
        assert!(agent.quiet);
    }

    #[test]
    fn test_apply_wrong_type_is_error() {
        let mut agent = AgentSettings::default();
        let result = agent.apply_table(agent_table("omit_hostname = \"yes\""));
        assert!(result.is_err());
    }

    // ── Config views ─────────────────────────────────────────────

    #[test]
    fn test_list_tags_sorted() {
        let mut config = Config::new();
        config.tags.insert("rack".into(), "1a".into());
        config.tags.insert("dc".into(), "us-east".into());
        assert_eq!(config.list_tags(), "dc=us-east rack=1a");
    }

    #[test]
    fn test_list_tags_empty() {
        assert_eq!(Config::new().list_tags(), "");
    }

    #[test]
    fn test_host_tag_uses_override() {
        let mut config = Config::new();
        config.agent.hostname = "edge-1".into();
        config.apply_host_tag();
        assert_eq!(config.tags.get("host").map(String::as_str), Some("edge-1"));
    }

    #[test]
    fn test_host_tag_omitted() {
        let mut config = Config::new();
        config.agent.omit_hostname = true;
        config.apply_host_tag();
        assert!(!config.tags.contains_key("host"));
    }

    #[test]
    fn test_host_tag_keeps_explicit_tag() {
        let mut config = Config::new();
        config.tags.insert("host".into(), "from-file".into());
        config.agent.hostname = "edge-1".into();
        config.apply_host_tag();
        assert_eq!(config.tags["host"], "from-file");
    }

    #[test]
    fn test_resolved_hostname_never_empty() {
        assert!(!AgentSettings::default().resolved_hostname().is_empty());
    }
}

//! End-to-end config loading against the built-in plugins.

use std::fs;
use std::path::Path;
use std::time::Duration;

use gatherd::conf::{Config, ConfigError};
use gatherd::metric::FieldValue;
use gatherd::plugin::{builtin, Output, PluginRegistry};

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    builtin::register_all(&mut registry);
    registry
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("Should write fixture");
}

#[test]
fn test_directory_load_and_gather() {
    let dir = tempfile::tempdir().unwrap();
    let value_file = dir.path().join("reading");
    fs::write(&value_file, "Temp: 23.5\n").unwrap();

    write(
        dir.path(),
        "a.conf",
        "[global_tags]\ndc = \"us-east\"\n\n[agent]\ninterval = \"15s\"\n",
    );
    write(
        dir.path(),
        "b.conf",
        &format!(
            "[[inputs.file]]\nfiles = [{:?}]\ndata_type = \"float\"\nname = \"sensor\"\n\n[[outputs.discard]]\n",
            value_file.display().to_string()
        ),
    );
    write(dir.path(), "notes.txt", "[[inputs.missing]]\n");

    let registry = registry();
    let mut config = Config::new();
    config.load_directory(dir.path(), &registry).unwrap();

    assert_eq!(config.agent.interval.as_std(), Duration::from_secs(15));
    assert_eq!(config.list_tags(), "dc=us-east");
    assert_eq!(config.input_names(), vec!["file"]);
    assert_eq!(config.output_names(), vec!["discard"]);

    let metrics = config.inputs[0].gather().unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].name, "sensor");
    assert_eq!(metrics[0].field("value"), Some(&FieldValue::Float(23.5)));

    let output = &mut config.outputs[0].output;
    output.connect().unwrap();
    output.write(&metrics).unwrap();
    output.close().unwrap();
}

#[test]
fn test_successive_files_layer_settings() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "base.conf", "[agent]\ninterval = \"30s\"\nhostname = \"edge\"\n");
    write(dir.path(), "override.conf", "[agent]\ninterval = 5\n");

    let registry = registry();
    let mut config = Config::new();
    config
        .load_config(Some(&dir.path().join("base.conf")), &registry)
        .unwrap();
    config
        .load_config(Some(&dir.path().join("override.conf")), &registry)
        .unwrap();

    assert_eq!(config.agent.interval.as_std(), Duration::from_secs(5));
    assert_eq!(config.agent.hostname, "edge");
}

#[test]
fn test_unknown_plugin_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.conf", "[[inputs.cpu]]\n");

    let mut config = Config::new();
    let err = config
        .load_config(Some(&dir.path().join("bad.conf")), &registry())
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfig { .. }));
    assert!(err.to_string().contains("bad.conf"));
}

#[test]
fn test_sample_config_for_builtin_input() {
    let mut out = Vec::new();
    registry().print_input_sample_config("file", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines().skip_while(|l| l.is_empty());
    assert_eq!(lines.next(), Some("# Read single values from files"));
    assert_eq!(lines.next(), Some("[[inputs.file]]"));
}

#[test]
fn test_default_sample_config_loads() {
    let registry = registry();
    let mut sample = Vec::new();
    gatherd::conf::print_sample_config(&registry, &[], &[], &mut sample).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gatherd.conf");
    fs::write(&path, &sample).unwrap();

    let mut config = Config::new();
    config.load_config(Some(&path), &registry).unwrap();
    assert_eq!(config.input_names(), vec!["file"]);
    assert_eq!(config.output_names(), vec!["discard"]);
    assert_eq!(config.agent.interval.as_std(), Duration::from_secs(10));
}

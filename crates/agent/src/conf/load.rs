//! Reading config files and directories into a [`Config`].
//!
//! Per file: read bytes, strip a UTF-8 BOM, substitute `$NAME` tokens from
//! the environment, parse TOML, then apply the `tags`/`global_tags` and
//! `agent` tables and create every configured plugin.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::env::substitute_env_vars;
use super::error::ConfigError;
use super::model::Config;
use crate::plugin::{Input, InputConfig, Output, PluginRegistry, RunningInput, RunningOutput};

/// Environment variable naming the config file to use.
pub const CONFIG_PATH_ENV: &str = "GATHERD_CONFIG_PATH";

/// Only files with this suffix are read from a config directory.
pub const CONFIG_SUFFIX: &str = ".conf";

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Top-level tables that configure the agent rather than a plugin.
const RESERVED_TABLES: [&str; 3] = ["tags", "global_tags", "agent"];

impl Config {
    /// Load a config file and apply it on top of the current contents.
    ///
    /// With no path (or an empty one) the default locations are probed; see
    /// [`default_config_candidates`].
    pub fn load_config(
        &mut self,
        path: Option<&Path>,
        registry: &PluginRegistry,
    ) -> Result<(), ConfigError> {
        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => default_config_path()?,
        };

        let table = parse_file(&path)?;
        self.apply_document(&path, table, registry)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(())
    }

    /// Load every `*.conf` file below `dir`, in file-name order, recursing
    /// into subdirectories. Entries that cannot be read for lack of
    /// permission are skipped with a warning.
    pub fn load_directory(
        &mut self,
        dir: &Path,
        registry: &PluginRegistry,
    ) -> Result<(), ConfigError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                warn!(path = %dir.display(), "Not permitted to read directory, skipping");
                return Ok(());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let mut entries: Vec<fs::DirEntry> = entries
            .filter_map(|entry| {
                entry
                    .inspect_err(|e| warn!(path = %dir.display(), error = %e, "Skipping unreadable entry"))
                    .ok()
            })
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Not permitted to read entry, skipping");
                    continue;
                }
            };

            if file_type.is_dir() {
                self.load_directory(&path, registry)?;
                continue;
            }
            if !is_config_file_name(&entry.file_name()) {
                continue;
            }

            skip_permission_denied(&path, self.load_config(Some(&path), registry))?;
        }
        Ok(())
    }

    fn apply_document(
        &mut self,
        path: &Path,
        table: toml::Table,
        registry: &PluginRegistry,
    ) -> Result<(), ConfigError> {
        // Tags first, so they are in place before any plugin is built.
        for name in ["tags", "global_tags"] {
            if let Some(value) = table.get(name) {
                self.apply_tags(path, name, value.clone())?;
            }
        }

        if let Some(value) = table.get("agent") {
            let toml::Value::Table(agent) = value else {
                return Err(ConfigError::invalid(path, "[agent] must be a table"));
            };
            self.agent
                .apply_table(agent.clone())
                .inspect_err(|_| tracing::error!("Could not parse [agent] config"))
                .map_err(|source| parse_error(path, source))?;
        }

        // Plugins are created in the order they appear in the file.
        for (name, value) in table {
            if RESERVED_TABLES.contains(&name.as_str()) {
                continue;
            }
            let toml::Value::Table(section) = value else {
                return Err(ConfigError::invalid(path, format!("{name} must be a table")));
            };

            match name.as_str() {
                "outputs" => {
                    for (plugin, value) in section {
                        for t in plugin_tables(path, &plugin, value)? {
                            self.add_output(path, &plugin, t, registry)?;
                        }
                    }
                }
                "inputs" | "plugins" => {
                    for (plugin, value) in section {
                        for t in plugin_tables(path, &plugin, value)? {
                            self.add_input(path, &plugin, t, registry)?;
                        }
                    }
                }
                // legacy top-level [cpu] style input
                _ => self.add_input(path, &name, section, registry)?,
            }
        }
        Ok(())
    }

    fn apply_tags(&mut self, path: &Path, name: &str, value: toml::Value) -> Result<(), ConfigError> {
        if !value.is_table() {
            return Err(ConfigError::invalid(path, format!("[{name}] must be a table")));
        }
        let tags: HashMap<String, String> = value
            .try_into()
            .inspect_err(|_| tracing::error!("Could not parse [{}] config", name))
            .map_err(|source| parse_error(path, source))?;

        for (key, value) in tags {
            if key.is_empty() {
                warn!(path = %path.display(), "Ignoring tag with an empty key");
                continue;
            }
            self.tags.insert(key, value);
        }
        Ok(())
    }

    fn add_input(
        &mut self,
        path: &Path,
        name: &str,
        mut table: toml::Table,
        registry: &PluginRegistry,
    ) -> Result<(), ConfigError> {
        if !self.input_filters.is_empty() && !self.input_filters.iter().any(|f| f == name) {
            return Ok(());
        }

        let factory = registry.input(name).ok_or_else(|| {
            ConfigError::invalid(path, format!("Undefined but requested input: {name}"))
        })?;

        let config = InputConfig::extract(name, &mut table)
            .map_err(|e| ConfigError::invalid(path, format!("inputs.{name}: {e}")))?;

        let mut input = factory();
        input
            .configure(table)
            .map_err(|e| ConfigError::invalid(path, format!("inputs.{name}: {e}")))?;

        debug!(plugin = %name, "Configured input");
        self.inputs.push(RunningInput::new(input, config));
        Ok(())
    }

    fn add_output(
        &mut self,
        path: &Path,
        name: &str,
        table: toml::Table,
        registry: &PluginRegistry,
    ) -> Result<(), ConfigError> {
        if !self.output_filters.is_empty() && !self.output_filters.iter().any(|f| f == name) {
            return Ok(());
        }

        let factory = registry.output(name).ok_or_else(|| {
            ConfigError::invalid(path, format!("Undefined but requested output: {name}"))
        })?;

        let mut output = factory();
        output
            .configure(table)
            .map_err(|e| ConfigError::invalid(path, format!("outputs.{name}: {e}")))?;

        debug!(plugin = %name, "Configured output");
        self.outputs.push(RunningOutput::new(name, output));
        Ok(())
    }
}

fn parse_error(path: &Path, source: toml::de::Error) -> ConfigError {
    ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

/// A plugin entry is either one table or an array of tables, one per
/// instance.
fn plugin_tables(path: &Path, plugin: &str, value: toml::Value) -> Result<Vec<toml::Table>, ConfigError> {
    let unsupported = || ConfigError::invalid(path, format!("Unsupported config format: {plugin}"));
    match value {
        toml::Value::Table(t) => Ok(vec![t]),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                toml::Value::Table(t) => Ok(t),
                _ => Err(unsupported()),
            })
            .collect(),
        _ => Err(unsupported()),
    }
}

/// A file in a directory walk that cannot be read for lack of permission is
/// skipped; every other failure stands.
fn skip_permission_denied(path: &Path, result: Result<(), ConfigError>) -> Result<(), ConfigError> {
    match result {
        Err(e) if e.is_permission_denied() => {
            warn!(path = %path.display(), "Not permitted to read config file, skipping");
            Ok(())
        }
        other => other,
    }
}

fn is_config_file_name(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|n| n.len() > CONFIG_SUFFIX.len() && n.ends_with(CONFIG_SUFFIX))
}

/// Strip a leading UTF-8 byte-order mark.
pub fn trim_bom(contents: &[u8]) -> &[u8] {
    contents.strip_prefix(UTF8_BOM).unwrap_or(contents)
}

/// Read a config file, substitute environment variables and parse it.
pub fn parse_file(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let contents = substitute_env_vars(trim_bom(&contents));
    let text = String::from_utf8(contents).map_err(|source| ConfigError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&text).map_err(|source| parse_error(path, source))
}

/// Default config locations, in probe order: `$GATHERD_CONFIG_PATH`,
/// `$HOME/.gatherd/gatherd.conf`, then the system-wide file.
pub fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(env_path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        candidates.push(PathBuf::from(env_path));
    }
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    candidates.push(home.join(".gatherd").join("gatherd.conf"));
    candidates.push(system_config_path());
    candidates
}

fn system_config_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Program Files\Gatherd\gatherd.conf")
    } else {
        PathBuf::from("/etc/gatherd/gatherd.conf")
    }
}

/// First candidate that exists.
pub fn find_config(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    for path in candidates {
        if fs::metadata(path).is_ok() {
            info!("Using config file: {}", path.display());
            return Ok(path.clone());
        }
    }

    let searched = std::iter::once(format!("${CONFIG_PATH_ENV}"))
        .chain(candidates.iter().map(|p| p.display().to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    Err(ConfigError::NoConfigFound { searched })
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    find_config(&default_config_candidates())
}

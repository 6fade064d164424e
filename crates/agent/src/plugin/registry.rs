//! Plugin registry mapping plugin names to factory functions.
//!
//! The registry is filled once at startup, before any configuration is
//! loaded, and only read afterwards. Pass it by shared reference to the
//! loader and the sample-config printer.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use super::traits::{Input, Output, Printer};

/// Factory function type for creating input instances
pub type InputFactory = fn() -> Box<dyn Input>;

/// Factory function type for creating output instances
pub type OutputFactory = fn() -> Box<dyn Output>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Input,
    Output,
}

impl PluginKind {
    /// Config-file section holding plugins of this kind.
    pub fn section(&self) -> &'static str {
        match self {
            PluginKind::Input => "inputs",
            PluginKind::Output => "outputs",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginKind::Input => f.write_str("Input"),
            PluginKind::Output => f.write_str("Output"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{kind} {name} not found")]
    PluginNotFound { kind: PluginKind, name: String },

    #[error("failed to write sample config: {0}")]
    Io(#[from] io::Error),
}

#[derive(Default)]
pub struct PluginRegistry {
    inputs: HashMap<String, InputFactory>,
    outputs: HashMap<String, OutputFactory>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("inputs", &self.input_names())
            .field("outputs", &self.output_names())
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input. A second registration under the same name
    /// replaces the first.
    pub fn register_input(&mut self, name: impl Into<String>, factory: InputFactory) {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!("Ignoring input registration with an empty name");
            return;
        }
        if self.inputs.insert(name.clone(), factory).is_some() {
            debug!(plugin = %name, "Overriding existing input registration");
        }
    }

    /// Register an output. A second registration under the same name
    /// replaces the first.
    pub fn register_output(&mut self, name: impl Into<String>, factory: OutputFactory) {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!("Ignoring output registration with an empty name");
            return;
        }
        if self.outputs.insert(name.clone(), factory).is_some() {
            debug!(plugin = %name, "Overriding existing output registration");
        }
    }

    pub fn input(&self, name: &str) -> Option<InputFactory> {
        self.inputs.get(name).copied()
    }

    pub fn output(&self, name: &str) -> Option<OutputFactory> {
        self.outputs.get(name).copied()
    }

    /// Registered input names, sorted.
    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered output names, sorted.
    pub fn output_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.outputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Print the sample config of a single input.
    pub fn print_input_sample_config<W: Write>(
        &self,
        name: &str,
        w: &mut W,
    ) -> Result<(), RegistryError> {
        let factory = self.input(name).ok_or_else(|| RegistryError::PluginNotFound {
            kind: PluginKind::Input,
            name: name.to_string(),
        })?;
        print_config(name, &*factory(), PluginKind::Input, false, w)?;
        Ok(())
    }

    /// Print the sample config of a single output.
    pub fn print_output_sample_config<W: Write>(
        &self,
        name: &str,
        w: &mut W,
    ) -> Result<(), RegistryError> {
        let factory = self.output(name).ok_or_else(|| RegistryError::PluginNotFound {
            kind: PluginKind::Output,
            name: name.to_string(),
        })?;
        print_config(name, &*factory(), PluginKind::Output, false, w)?;
        Ok(())
    }
}

/// Render one plugin as a config-file fragment: a description comment, the
/// `[[section.name]]` header, then the sample body. The first and last lines
/// of the body are its framing and come out as bare newlines.
pub fn print_config<P, W>(
    name: &str,
    plugin: &P,
    kind: PluginKind,
    commented: bool,
    w: &mut W,
) -> io::Result<()>
where
    P: Printer + ?Sized,
    W: Write,
{
    let comment = if commented { "# " } else { "" };
    write!(
        w,
        "\n{comment}# {}\n{comment}[[{}.{}]]",
        plugin.description(),
        kind.section(),
        name
    )?;

    let config = plugin.sample_config();
    if config.is_empty() {
        write!(w, "\n{comment}  # no configuration\n\n")?;
        return Ok(());
    }

    let lines: Vec<&str> = config.split('\n').collect();
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        if i == 0 || i == last {
            writeln!(w)?;
            continue;
        }
        writeln!(w, "{}", format!("{comment}{line}").trim_end_matches(' '))?;
    }
    Ok(())
}

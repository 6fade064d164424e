//! Dispatch on the command-line mode.

use std::io::{self, Write};

use anyhow::{bail, Context};
use tracing::{error, info};

use crate::cli::Cli;
use crate::conf::{print_sample_config, Config};
use crate::plugin::{Output, PluginRegistry, RegistryError};
use super::boot;

pub fn run(cli: &Cli, registry: &PluginRegistry) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(name) = &cli.usage {
        return print_usage(registry, name, &mut out);
    }

    if cli.sample_config {
        print_sample_config(registry, &cli.input_filter, &cli.output_filter, &mut out)
            .context("failed to print sample config")?;
        return Ok(());
    }

    let mut config = boot::load_config(cli, registry)?;
    if config.inputs.is_empty() {
        bail!("no inputs found, did you provide a valid config file?");
    }

    if cli.test {
        return gather_once(&mut config, &mut out);
    }

    for output in &mut config.outputs {
        output
            .output
            .connect()
            .with_context(|| format!("failed to connect to output {}", output.name))?;
        info!(output = %output.name, "Connected");
    }
    for output in &mut config.outputs {
        if let Err(e) = output.output.close() {
            error!(output = %output.name, error = %e, "Failed to close output");
        }
    }
    Ok(())
}

/// Print one plugin's sample config, trying inputs before outputs.
fn print_usage<W: Write>(registry: &PluginRegistry, name: &str, w: &mut W) -> anyhow::Result<()> {
    match registry.print_input_sample_config(name, w) {
        Err(RegistryError::PluginNotFound { .. }) => {}
        other => return Ok(other?),
    }
    match registry.print_output_sample_config(name, w) {
        Err(RegistryError::PluginNotFound { .. }) => {
            bail!("{name} is not an available input or output plugin")
        }
        other => Ok(other?),
    }
}

/// Gather every input once and print the metrics as JSON lines, tagged with
/// the global tags.
fn gather_once<W: Write>(config: &mut Config, w: &mut W) -> anyhow::Result<()> {
    for input in &mut config.inputs {
        let metrics = input
            .gather()
            .with_context(|| format!("failed to gather from input {}", input.name()))?;
        for mut metric in metrics {
            for (k, v) in &config.tags {
                metric.add_tag_if_absent(k, v);
            }
            writeln!(w, "{}", serde_json::to_string(&metric)?)?;
        }
    }
    Ok(())
}

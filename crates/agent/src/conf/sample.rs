//! The complete annotated config file printed by `--sample-config`.

use std::io::{self, Write};

use crate::plugin::registry::print_config;
use crate::plugin::{builtin, PluginKind, PluginRegistry};

/// Inputs printed uncommented when no input filter is given.
pub const INPUT_DEFAULTS: &[&str] = builtin::INPUTS;

/// Outputs printed uncommented when no output filter is given.
pub const OUTPUT_DEFAULTS: &[&str] = builtin::OUTPUTS;

const HEADER: &str = r#"# gatherd configuration
#
# gatherd is entirely plugin driven. All metrics are gathered from the
# declared inputs, and sent to the declared outputs.
#
# Plugins must be declared in here to be active.
# To deactivate a plugin, comment out the name and any variables.
#
# Environment variables can be used anywhere in this config file, simply
# prepend them with $. For strings the variable must be within quotes
# (ie, "$STR_VAR"), for numbers and booleans they should be plain
# (ie, $INT_VAR, $BOOL_VAR)


# Global tags can be specified here in key="value" format.
[global_tags]
  # dc = "us-east-1" # will tag all metrics with dc=us-east-1
  # rack = "1a"
  ## Environment variables can be used as tags, and throughout the config file
  # user = "$USER"


# Configuration for the agent
[agent]
  ## Default data collection interval for all inputs
  interval = "10s"
  ## Rounds collection interval to 'interval'
  ## ie, if interval="10s" then always collect on :00, :10, :20, etc.
  round_interval = true

  ## Outputs receive metrics in batches of at most metric_batch_size metrics.
  metric_batch_size = 1000

  ## Metrics buffered per output while writes fail; oldest are dropped first.
  metric_buffer_limit = 10000

  ## Each input sleeps for a random time within jitter before collecting.
  collection_jitter = "0s"

  ## Default flushing interval for all outputs.
  flush_interval = "10s"
  ## Jitter the flush interval by a random amount.
  flush_jitter = "0s"

  ## Timestamp precision; empty derives it from interval, at most 1s.
  precision = ""

  ## Logging configuration:
  ## Log at debug level.
  debug = false
  ## Log only error level messages.
  quiet = false
  ## Log file name; the empty string means stderr.
  logfile = ""

  ## Override default hostname, if empty use the machine's hostname
  hostname = ""
  ## If set to true, do not set the "host" tag.
  omit_hostname = false
"#;

const OUTPUT_HEADER: &str = r#"

###############################################################################
#                            OUTPUT PLUGINS                                   #
###############################################################################
"#;

const INPUT_HEADER: &str = r#"

###############################################################################
#                            INPUT PLUGINS                                    #
###############################################################################
"#;

/// Print a complete config file covering every registered plugin.
///
/// With a filter, only the named plugins are printed. Without one, the
/// defaults are printed active and every other plugin commented out.
pub fn print_sample_config<W: Write>(
    registry: &PluginRegistry,
    input_filters: &[String],
    output_filters: &[String],
    w: &mut W,
) -> io::Result<()> {
    w.write_all(HEADER.as_bytes())?;

    w.write_all(OUTPUT_HEADER.as_bytes())?;
    print_section(registry, PluginKind::Output, output_filters, OUTPUT_DEFAULTS, w)?;

    w.write_all(INPUT_HEADER.as_bytes())?;
    print_section(registry, PluginKind::Input, input_filters, INPUT_DEFAULTS, w)
}

fn print_section<W: Write>(
    registry: &PluginRegistry,
    kind: PluginKind,
    filters: &[String],
    defaults: &[&str],
    w: &mut W,
) -> io::Result<()> {
    let names = match kind {
        PluginKind::Input => registry.input_names(),
        PluginKind::Output => registry.output_names(),
    };

    let (active, rest): (Vec<&str>, Vec<&str>) = if filters.is_empty() {
        names.into_iter().partition(|n| defaults.contains(n))
    } else {
        let active = names
            .into_iter()
            .filter(|n| filters.iter().any(|f| f == n))
            .collect();
        (active, Vec::new())
    };

    for name in active {
        print_named(registry, kind, name, false, w)?;
    }
    for name in rest {
        print_named(registry, kind, name, true, w)?;
    }
    Ok(())
}

fn print_named<W: Write>(
    registry: &PluginRegistry,
    kind: PluginKind,
    name: &str,
    commented: bool,
    w: &mut W,
) -> io::Result<()> {
    match kind {
        PluginKind::Input => match registry.input(name) {
            Some(factory) => print_config(name, &*factory(), kind, commented, w),
            None => Ok(()),
        },
        PluginKind::Output => match registry.output(name) {
            Some(factory) => print_config(name, &*factory(), kind, commented, w),
            None => Ok(()),
        },
    }
}

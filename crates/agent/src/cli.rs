//! Command-line interface definitions for gatherd.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Plugin-driven metrics agent.
///
/// Loads the configuration, creates the configured inputs and outputs, and
/// reports what was loaded.
#[derive(Parser, Debug)]
#[command(name = "gatherd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to load.
    ///
    /// Without one, $GATHERD_CONFIG_PATH, ~/.gatherd/gatherd.conf and the
    /// system-wide file are tried in that order.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of additional *.conf files, loaded after --config.
    #[arg(long)]
    pub config_directory: Option<PathBuf>,

    /// Colon-separated list of inputs to enable, e.g. "cpu:mem".
    #[arg(long, value_delimiter = ':')]
    pub input_filter: Vec<String>,

    /// Colon-separated list of outputs to enable, e.g. "influxdb:file".
    #[arg(long, value_delimiter = ':')]
    pub output_filter: Vec<String>,

    /// Print the sample config of one plugin and exit.
    #[arg(long, value_name = "PLUGIN")]
    pub usage: Option<String>,

    /// Print a complete sample config and exit.
    #[arg(long)]
    pub sample_config: bool,

    /// Gather every configured input once, print the metrics and exit.
    #[arg(long)]
    pub test: bool,

    /// Log at debug level.
    #[arg(long)]
    pub debug: bool,

    /// Log errors only.
    #[arg(long, conflicts_with = "debug")]
    pub quiet: bool,
}

//! Boot: logging init, plugin registration, config load.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::conf::Config;
use crate::plugin::{builtin, PluginRegistry};

/// Initialise the tracing / logging subsystem.
pub fn init_logging(debug: bool, quiet: bool) {
    let default_directive = if debug {
        "gatherd=debug"
    } else if quiet {
        "gatherd=error"
    } else {
        "gatherd=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the plugin registry. All registration happens here, before any
/// lookup.
pub fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    builtin::register_all(&mut registry);
    registry
}

/// Load the config file (and directory, if given) selected on the command
/// line.
pub fn load_config(cli: &Cli, registry: &PluginRegistry) -> anyhow::Result<Config> {
    let mut config = Config::new();
    config.input_filters = cli.input_filter.clone();
    config.output_filters = cli.output_filter.clone();

    config
        .load_config(cli.config.as_deref(), registry)
        .context("failed to load configuration")?;

    if let Some(dir) = &cli.config_directory {
        config
            .load_directory(dir, registry)
            .with_context(|| format!("failed to load configuration directory {}", dir.display()))?;
    }

    config.apply_host_tag();

    info!("Loaded inputs: {}", config.input_names().join(" "));
    info!("Loaded outputs: {}", config.output_names().join(" "));
    info!("Tags enabled: {}", config.list_tags());
    info!(
        "Agent Config: Interval:{}, Hostname:{:?}, Flush Interval:{}",
        config.agent.interval,
        config.agent.resolved_hostname(),
        config.agent.flush_interval
    );

    Ok(config)
}

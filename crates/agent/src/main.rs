use clap::Parser;
use gatherd::cli::Cli;
use gatherd::runtime::{boot, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    boot::init_logging(cli.debug, cli.quiet);
    let registry = boot::registry();
    run::run(&cli, &registry)
}

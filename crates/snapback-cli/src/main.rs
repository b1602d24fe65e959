mod cli;
mod logger;
mod run;

use anyhow::Context;
use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    logger::init(level).context("Failed to initialize logging")?;

    if cli.verbose {
        tracing::debug!(?cli, "Verbose mode enabled");
    }

    run::Run::execute(&cli)
}

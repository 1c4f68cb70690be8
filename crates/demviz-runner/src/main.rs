//! `demviz` binary.

use clap::Parser;
use demviz_runner::cli::{execute, Cli};
use demviz_runner::logging::init_logging;
use demviz_runner::{Config, Pipeline, Result};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let pipeline = Pipeline::from_config(&config)?;
    execute(&cli.command, &config, pipeline)
}

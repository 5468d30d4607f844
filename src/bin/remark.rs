//! Remark CLI Binary
//!
//! Command-line interface for posting and removing comments on a local store.

use anyhow::Context;
use clap::Parser;
use remark::logging::init_logging;
use remark::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.load_config().context("loading configuration")?;
    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let context = CliContext::new(&config, cli.store.clone()).context("opening comment store")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

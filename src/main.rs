mod analyse_cmd;
mod cli;
mod config;
mod convert;
mod logging;
mod predict_cmd;
mod train_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Analyse(args) => analyse_cmd::run(args),
        Command::Train(args) => train_cmd::run(args),
        Command::Predict(args) => predict_cmd::run(args),
    }
}

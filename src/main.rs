use std::process::ExitCode;

use clap::Parser;

use tilebreak::cli;
use tilebreak::logger;

fn main() -> ExitCode {
    // Session log (overwrites the previous session's file)
    logger::init();

    let args = cli::CliArgs::parse();
    cli::run(args)
}

// cmakescan/src/main.rs

use anyhow::Result;
use clap::Parser;
use cmakescan::cli::{run, Cli};
use std::io;
use std::process::ExitCode;

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    run(&cli, io::stdin().lock(), io::stdout().lock())
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

// Billsplit command line entry point.

use std::process::ExitCode;

use billsplit_host::CliArgs;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    match billsplit_host::run(CliArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

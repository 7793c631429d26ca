use std::process::ExitCode;

use clap::Parser;
use gen_cli::{logging, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    match gen_cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(category = error.category(), "invocation failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

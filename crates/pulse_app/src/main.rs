use std::process::ExitCode;

use clap::Parser;
use pulse_app::platform::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match platform::run_app(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

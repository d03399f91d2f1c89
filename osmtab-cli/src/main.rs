//! Entry point for the `osmtab` converter.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use osmtab_cli::{CliError, run, usage};

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "the binary reports to the terminal"
)]
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(CliError::ArgumentParsing(err)) if !err.use_stderr() => {
            print!("{err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("osmtab: {err}");
            eprintln!("{}", usage());
            ExitCode::FAILURE
        }
    }
}

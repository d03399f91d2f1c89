//! Entry point for the `osmtab-stat` file statistics tool.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use osmtab_cli::{CliError, run_stat, stat_usage};

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "the binary reports to the terminal"
)]
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run_stat() {
        Ok(stats) => {
            println!("{stats}");
            ExitCode::SUCCESS
        }
        Err(CliError::ArgumentParsing(err)) if !err.use_stderr() => {
            print!("{err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("osmtab-stat: {err}");
            eprintln!("{}", stat_usage());
            ExitCode::FAILURE
        }
    }
}

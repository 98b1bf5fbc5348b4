// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

use std::process::ExitCode;

mod cli;
mod commands;
mod display;

fn main() -> ExitCode {
    let cli = cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

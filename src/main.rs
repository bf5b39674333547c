//! nutbar - polling engine for a nut-reaction usage widget
//!
//! Periodically fetches a user's 🥜 reaction counts from the hub, derives
//! daily-allowance figures against a fixed UTC reset boundary, and keeps a
//! race-free view of the current stats:
//! - CLI for one-shot queries (`nutbar stats --fid N`)
//! - Continuous polling with the same engine the widget embeds
//!   (`nutbar watch --fid N`)

mod cli;
mod core;
mod display;
mod frame;
mod host;
mod hub;
mod logging;
mod poller;
mod settings;
mod share;

use clap::Parser;
use cli::{exit_codes, Cli, Commands};

use crate::core::FetchError;
use crate::settings::SettingsError;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    match cli.command {
        Commands::Stats(args) => rt.block_on(async {
            match cli::stats::run(args).await {
                Ok(()) => exit_codes::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    categorize_error(&e)
                }
            }
        }),
        Commands::Watch(args) => rt.block_on(async {
            match cli::watch::run(args).await {
                Ok(()) => exit_codes::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    categorize_error(&e)
                }
            }
        }),
        Commands::Share(args) => match cli::share::run(args) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                categorize_error(&e)
            }
        },
    }
}

/// Categorize an error into the appropriate exit code
fn categorize_error(e: &anyhow::Error) -> i32 {
    if e.downcast_ref::<SettingsError>().is_some() {
        exit_codes::CONFIG_ERROR
    } else if e.downcast_ref::<FetchError>().is_some() {
        exit_codes::FETCH_FAILURE
    } else {
        exit_codes::UNEXPECTED_FAILURE
    }
}

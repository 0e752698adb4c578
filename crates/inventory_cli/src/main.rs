//! Inventory catalog command-line front end.
//!
//! # Responsibility
//! - Resolve configuration from file, environment and flags.
//! - Run one catalog command and print its JSON result.
//!
//! # Invariants
//! - Success prints JSON to stdout and exits 0.
//! - Failure prints `{"code", "message"}` to stderr and exits non-zero.

mod args;
mod commands;
mod error;

use args::Cli;
use clap::Parser;
use error::{CliError, CliResult};
use inventory_core::{init_logging, CatalogConfig};
use log::info;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => report(&CliError::Payload(err)),
        },
        Err(err) => report(&err),
    }
}

fn run(cli: Cli) -> CliResult<Value> {
    let config = CatalogConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let db_path = cli
        .db
        .unwrap_or_else(|| PathBuf::from(&config.database_path));
    let actor = cli.actor.unwrap_or(config.default_actor);

    let started_at = Instant::now();
    let result = commands::execute(&db_path, &actor, cli.command);
    info!(
        "event=cli_command module=cli status={} duration_ms={}",
        if result.is_ok() { "ok" } else { "error" },
        started_at.elapsed().as_millis()
    );
    result
}

fn report(err: &CliError) -> ExitCode {
    match serde_json::to_string(&err.body()) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{err}"),
    }
    ExitCode::FAILURE
}

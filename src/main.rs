//! Bakehouse CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use bakehouse::cli::{Args, run};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match run(&args, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "order failed");

            ExitCode::FAILURE
        }
    }
}

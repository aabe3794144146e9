//! cogniwell - terminal client for the cognitive-training service.
//!
//! A thin wrapper over `cogniwell-core`: every command goes through the
//! authenticated API client, so an expired session ends the same way here
//! as anywhere else.

mod cli;
mod commands;
mod navigator;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use cogniwell_core::Config;

/// Initialize the tracing subscriber for logging.
///
/// RUST_LOG wins over -v. The returned guard flushes the log file on drop.
fn init_tracing(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    let mut config = Config::load()?;
    if let Commands::Config { store, timeout_ms } = cli.command {
        return commands::configure(config, cli.origin, store, timeout_ms);
    }
    config.apply_env()?;
    if let Some(origin) = cli.origin {
        config.origin = Some(origin);
    }

    // Request handling runs on a single thread, like the browser event loop
    // the service was built for.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    info!("cogniwell starting");
    runtime.block_on(commands::handle(&config, cli.command))
}

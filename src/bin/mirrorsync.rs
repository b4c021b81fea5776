//! Mirrorsync CLI Binary
//!
//! Runs one-way folder mirroring from the command line.

use anyhow::Context;
use clap::Parser;
use mirrorsync::cli::{apply_cli_overrides, map_error, Cli, RunContext};
use mirrorsync::config::{ConfigLoader, MirrorConfig};
use mirrorsync::error::SyncError;
use mirrorsync::logging::{init_logging, TracingLogger};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    if cli.print_config {
        match config.to_toml() {
            Ok(text) => {
                print!("{}", text);
                return;
            }
            Err(e) => {
                eprintln!("{}", map_error(&e));
                process::exit(1);
            }
        }
    }

    if let Err(e) = init_logging(&config.logging).context("Failed to initialize logging") {
        eprintln!("{:#}", e);
        process::exit(1);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Mirrorsync starting");

    let context = RunContext::new(&cli, config);
    match context.execute(&TracingLogger) {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => info!("Mirrorsync stopped"),
        Err(e) => {
            error!("Mirrorsync failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build the effective configuration.
/// Precedence: CLI flags override environment override config files override defaults.
fn build_config(cli: &Cli) -> Result<MirrorConfig, SyncError> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    apply_cli_overrides(cli, &mut config);
    config.validate()?;
    Ok(config)
}

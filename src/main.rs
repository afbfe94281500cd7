//! docrelay - author a tree-structured visual document once, mirror it live
//! on every connected render surface.

mod cli;
mod codec;
mod config;
mod core;
mod editor;
mod embed;
mod logger;
mod model;
mod observer;
mod relay;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, ExportFormat};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(AppConfig::load(&cli)?);

    match &cli.command {
        Commands::Relay { .. } => cli::relay::run_relay(&config),
        Commands::Watch { out, .. } => cli::watch::run_watch(&config, out.as_deref()),
        Commands::Replay {
            script,
            offline,
            out,
            ..
        } => cli::replay::run_replay(&config, script, *offline, out.as_deref()),
        Commands::Export {
            snapshot,
            markup,
            stylesheet,
            out,
        } => cli::export::run_export(
            snapshot,
            ExportFormat::from_flags(*markup, *stylesheet),
            out.as_deref(),
        ),
        Commands::Health { .. } => cli::health::run_health(&config),
    }
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Live relay for tree-structured visual documents
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docrelay.toml)
    #[arg(short = 'C', long, global = true, default_value = "docrelay.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the relay: ingestion endpoints, observer channels and heartbeat
    #[command(visible_alias = "r")]
    Relay {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// HTTP port for the ingestion endpoints
        #[arg(short, long)]
        port: Option<u16>,

        /// WebSocket port for observer channels
        #[arg(short = 'w', long)]
        ws_port: Option<u16>,

        /// Heartbeat interval in milliseconds
        #[arg(long)]
        heartbeat_ms: Option<u64>,
    },

    /// Mirror the relayed document as an observer
    #[command(visible_alias = "w")]
    Watch {
        /// Observer channel URL (e.g., ws://localhost:4001)
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        relay: Option<String>,

        /// Re-render the mirrored document to this HTML file on every update
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Apply a JSON-lines edit script and publish every step
    #[command(visible_alias = "p")]
    Replay {
        /// Edit script, one edit per line (`-` reads stdin)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        script: PathBuf,

        /// Relay base URL (e.g., http://localhost:4000)
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        relay: Option<String>,

        /// Apply the edits locally without publishing
        #[arg(long)]
        offline: bool,

        /// Write the final snapshot to this file
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Render a snapshot file as static HTML
    #[command(visible_alias = "e")]
    Export {
        /// Snapshot JSON file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Emit only the element markup
        #[arg(short, long, conflicts_with = "stylesheet")]
        markup: bool,

        /// Emit only the stylesheet
        #[arg(short, long)]
        stylesheet: bool,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Check whether the relay is reachable
    Health {
        /// Relay base URL (e.g., http://localhost:4000)
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        relay: Option<String>,
    },
}

/// What `export` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Document,
    Markup,
    Stylesheet,
}

impl ExportFormat {
    pub const fn from_flags(markup: bool, stylesheet: bool) -> Self {
        match (markup, stylesheet) {
            (true, _) => Self::Markup,
            (_, true) => Self::Stylesheet,
            _ => Self::Document,
        }
    }
}

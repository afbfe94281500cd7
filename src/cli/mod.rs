//! Command-line interface module.

mod args;
pub mod export;
pub mod health;
pub mod relay;
pub mod replay;
pub mod watch;

pub use args::{Cli, Commands, ExportFormat};

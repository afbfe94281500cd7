//! Core types - process lifecycle state and time shared across the codebase.

mod clock;
mod state;

pub use clock::now_millis;
pub use state::{is_shutdown, register_poller, register_server, setup_shutdown_handler};

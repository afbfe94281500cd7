//! Shutdown state for long-running commands.
//!
//! - Before `register_server()`: Ctrl+C exits the process immediately
//! - After `register_server()`: graceful shutdown (unblock HTTP server,
//!   notify the relay actor, close observer channels)
//! - After `register_poller()`: only the flag is raised; the caller's loop
//!   checks `is_shutdown()` and winds down on its own

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for the relay actor
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// A blocking loop polls the shutdown flag
static POLLING: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if let Some(server) = SERVER.get() {
            crate::log!("relay"; "shutting down...");
            request_shutdown();
            server.unblock();
        } else if POLLING.load(Ordering::SeqCst) {
            request_shutdown();
        } else {
            // Nothing to drain (observer, replay, export): leave right away
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Let Ctrl+C raise the flag instead of exiting
pub fn register_poller() {
    POLLING.store(true, Ordering::SeqCst);
}

/// Flag shutdown and notify the relay actor.
fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    if let Some(tx) = SHUTDOWN_TX.get() {
        let _ = tx.send(());
    }
}

/// Check if shutdown has been requested
///
/// Relaxed ordering: worst case a loop runs one more iteration
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

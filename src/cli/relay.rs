//! `relay` command.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::log;
use crate::relay;
use crate::utils::plural::plural_count;

/// Bind both listeners and serve until Ctrl+C.
pub fn run_relay(config: &AppConfig) -> Result<()> {
    let settings = Arc::new(config.relay.clone());
    let bound = relay::bind(Arc::clone(&settings))?;

    let addr = bound.addr();
    log!("relay"; "ingestion on http://{}", addr);
    log!("relay"; "observers on ws://{}", SocketAddr::new(addr.ip(), bound.ws_port()));
    log!(
        "relay";
        "heartbeat every {}ms, {}",
        settings.heartbeat_ms,
        plural_count(settings.workers, "worker")
    );

    bound.run()
}

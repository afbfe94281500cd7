//! `[relay]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [relay]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 4000                 # HTTP ingestion endpoints
//! ws_port = 4001              # Observer channels
//! heartbeat_ms = 5000         # Tick interval
//! allowed_origins = ["http://localhost:5173", "http://localhost:5174"]
//! workers = 4                 # Request worker threads
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port for the ingestion endpoints.
    pub port: u16,

    /// WebSocket port for observer channels.
    pub ws_port: u16,

    /// Heartbeat interval in milliseconds.
    pub heartbeat_ms: u64,

    /// Browser origins allowed by CORS.
    pub allowed_origins: Vec<String>,

    /// Request worker threads.
    pub workers: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 4000,
            ws_port: 4001,
            heartbeat_ms: 5000,
            allowed_origins: vec![
                "http://localhost:5173".to_owned(),
                "http://localhost:5174".to_owned(),
            ],
            workers: 4,
        }
    }
}

impl RelayConfig {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }
}

//! `[observer]` section configuration.
//!
//! ```toml
//! [observer]
//! relay_ws = "ws://localhost:4001"
//! ```

use serde::{Deserialize, Serialize};

/// Observer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// WebSocket URL of the relay's observer channel.
    pub relay_ws: String,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            relay_ws: "ws://localhost:4001".to_owned(),
        }
    }
}

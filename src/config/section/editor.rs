//! `[editor]` section configuration.
//!
//! ```toml
//! [editor]
//! relay_url = "http://localhost:4000"
//! ```

use serde::{Deserialize, Serialize};

/// Authoring-session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Base URL of the relay's ingestion endpoints.
    pub relay_url: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://localhost:4000".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_editor_config() {
        assert_eq!(test_parse_config("").editor.relay_url, "http://localhost:4000");

        let config = test_parse_config("[editor]\nrelay_url = \"http://relay.lan:9000\"");
        assert_eq!(config.editor.relay_url, "http://relay.lan:9000");
    }
}

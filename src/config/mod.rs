//! Configuration management for `docrelay.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [relay], [editor], [observer]
//! ├── error          # ConfigError
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! The file is optional: every field has a default. Command-line flags
//! override file values. The loaded value is handed out as an `Arc` by the
//! entry point; there is no global config.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{EditorConfig, ObserverConfig, RelayConfig};

use crate::cli::{Cli, Commands};
use crate::log;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Root configuration structure representing docrelay.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Relay settings
    #[serde(default)]
    pub relay: RelayConfig,

    /// Authoring session settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Observer settings
    #[serde(default)]
    pub observer: ObserverConfig,
}

impl AppConfig {
    /// Load configuration for `cli`: file (if present), then flags, then
    /// validation.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = if cli.config.exists() {
            Self::from_path(&cli.config)?
        } else {
            Self::default()
        };

        config.apply_command_options(&cli.command);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, command: &Commands) {
        match command {
            Commands::Relay {
                interface,
                port,
                ws_port,
                heartbeat_ms,
            } => {
                Self::update_option(&mut self.relay.interface, interface.as_ref());
                Self::update_option(&mut self.relay.port, port.as_ref());
                Self::update_option(&mut self.relay.ws_port, ws_port.as_ref());
                Self::update_option(&mut self.relay.heartbeat_ms, heartbeat_ms.as_ref());
            }
            Commands::Watch { relay, .. } => {
                Self::update_option(&mut self.observer.relay_ws, relay.as_ref());
            }
            Commands::Replay { relay, .. } | Commands::Health { relay } => {
                Self::update_option(&mut self.editor.relay_url, relay.as_ref());
            }
            Commands::Export { .. } => {}
        }
    }

    /// Overwrite `target` when the flag was given.
    fn update_option<T: Clone>(target: &mut T, value: Option<&T>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Check value ranges and URL schemes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let relay = &self.relay;
        if relay.port == 0 {
            return Err(invalid("relay.port must be non-zero"));
        }
        if relay.ws_port == 0 {
            return Err(invalid("relay.ws_port must be non-zero"));
        }
        if relay.port == relay.ws_port {
            return Err(invalid("relay.port and relay.ws_port must differ"));
        }
        if relay.heartbeat_ms == 0 {
            return Err(invalid("relay.heartbeat_ms must be greater than 0"));
        }
        if relay.workers == 0 {
            return Err(invalid("relay.workers must be greater than 0"));
        }
        for origin in &relay.allowed_origins {
            check_scheme("relay.allowed_origins", origin, &["http", "https"])?;
        }
        check_scheme("editor.relay_url", &self.editor.relay_url, &["http", "https"])?;
        check_scheme("observer.relay_ws", &self.observer.relay_ws, &["ws", "wss"])?;
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

fn check_scheme(field: &str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let url = url::Url::parse(value).map_err(|e| invalid(format!("{field}: `{value}` is not a URL ({e})")))?;
    if schemes.contains(&url.scheme()) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{field}: `{value}` must use {}",
            schemes.join(" or ")
        )))
    }
}

/// Parse a config snippet for tests, rejecting unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("docrelay").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) =
            AppConfig::parse_with_ignored("[relay]\nport = 4000\nbogus = 1\n[extra]\nx = 1").unwrap();
        assert_eq!(ignored, ["relay.bogus", "extra"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_str("[relay\nport = 1"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AppConfig::from_str("[relay]\nport = \"four\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            "[relay]\nport = 0",
            "[relay]\nws_port = 4000",
            "[relay]\nheartbeat_ms = 0",
            "[relay]\nworkers = 0",
            "[relay]\nallowed_origins = [\"localhost:5173\"]",
            "[editor]\nrelay_url = \"ws://localhost:4000\"",
            "[observer]\nrelay_ws = \"http://localhost:4001\"",
            "[observer]\nrelay_ws = \"not a url\"",
        ];
        for case in cases {
            let config = test_parse_config(case);
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{case}"
            );
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrelay.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[relay]\nport = 7000\nws_port = 7001").unwrap();

        let path = path.to_str().unwrap();
        let config = AppConfig::load(&cli(&["-C", path, "relay", "--port", "7100"])).unwrap();
        assert_eq!(config.relay.port, 7100);
        assert_eq!(config.relay.ws_port, 7001);

        let config = AppConfig::load(&cli(&["-C", path, "watch", "-r", "ws://10.0.0.2:7001"])).unwrap();
        assert_eq!(config.observer.relay_ws, "ws://10.0.0.2:7001");
        assert_eq!(config.relay.port, 7000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = AppConfig::load(&cli(&["-C", path.to_str().unwrap(), "health"])).unwrap();
        assert_eq!(config.editor.relay_url, "http://localhost:4000");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let result = AppConfig::load(&cli(&["-C", path.to_str().unwrap(), "health", "-r", "localhost"]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}

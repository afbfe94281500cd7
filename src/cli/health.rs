//! `health` command.

use anyhow::{Result, bail};

use crate::config::AppConfig;
use crate::editor::RelayClient;
use crate::log;

pub fn run_health(config: &AppConfig) -> Result<()> {
    let url = config.editor.relay_url.as_str();
    let client = RelayClient::new(url)?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    if runtime.block_on(client.check_health()) {
        log!("relay"; "{} is up", url);
        Ok(())
    } else {
        bail!("relay at {url} is not reachable")
    }
}

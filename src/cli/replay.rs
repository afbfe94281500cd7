//! `replay` command: run an authoring session from an edit script.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::runtime::Runtime;

use crate::codec::Codec;
use crate::config::AppConfig;
use crate::editor::{
    Applied, EditStep, EditorEvent, EditorEvents, EditorSession, Publisher, RelayClient,
    ViewportPublisher, parse_script,
};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Tally of one replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub nodes: usize,
}

/// Apply the script at `script` (`-` for stdin), publishing unless `offline`.
pub fn run_replay(config: &AppConfig, script: &Path, offline: bool, out: Option<&Path>) -> Result<()> {
    let text = read_script(script)?;
    let steps = parse_script(&text).with_context(|| format!("invalid script {}", script.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let relay = if offline {
        None
    } else {
        Some(connect(&runtime, &config.editor.relay_url)?)
    };

    let summary = replay(&runtime, steps, relay, out)?;
    log!(
        "editor";
        "{} applied, {} unchanged, {} failed; document has {}",
        plural_count(summary.changed, "edit"),
        summary.unchanged,
        summary.failed,
        plural_count(summary.nodes, "node")
    );
    Ok(())
}

fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("failed to read script from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Publishing handles for one relay.
struct Remote {
    publisher: Publisher,
    viewports: ViewportPublisher,
}

fn connect(runtime: &Runtime, url: &str) -> Result<Remote> {
    let client = RelayClient::new(url)?;
    runtime.block_on(client.check_health());
    if client.is_connected() {
        log!("editor"; "publishing to {}", url);
    } else {
        // Edits still apply locally; publishing failures are logged per job
        log!("editor"; "relay at {} is not reachable, edits will not be mirrored", url);
    }
    Ok(Remote {
        publisher: Publisher::spawn(client.clone(), runtime.handle()),
        viewports: ViewportPublisher::new(client, runtime.handle().clone()),
    })
}

fn replay(
    runtime: &Runtime,
    steps: Vec<EditStep>,
    mut remote: Option<Remote>,
    out: Option<&Path>,
) -> Result<ReplaySummary> {
    let (events, rx) = EditorEvents::channel();
    let publisher = remote.as_ref().map(|r| r.publisher.clone());
    let mut session = EditorSession::new(Codec::new(), publisher, events);
    let mut summary = ReplaySummary::default();

    for (index, step) in steps.into_iter().enumerate() {
        match session.apply(step) {
            Ok(Applied::Document(true)) => summary.changed += 1,
            Ok(Applied::Document(false) | Applied::Selection(false)) => summary.unchanged += 1,
            Ok(Applied::Selection(true)) => {}
            Ok(Applied::Viewport(viewport)) => {
                if let Some(remote) = remote.as_mut() {
                    remote.viewports.publish(viewport);
                }
            }
            Err(e) => {
                summary.failed += 1;
                log!("editor"; "step {}: {}", index + 1, e);
            }
        }
        drain_events(&rx);
    }
    summary.nodes = session.tree().len();

    if let Some(remote) = remote.as_mut() {
        remote.publisher.publish_actions(session.actions().to_vec());
        runtime.block_on(async {
            remote.publisher.flush().await;
            remote.viewports.settle().await;
        });
        if remote.viewports.superseded() > 0 {
            debug!("editor"; "{} superseded", plural_count(remote.viewports.superseded(), "viewport"));
        }
    }

    if let Some(path) = out {
        session
            .snapshot()
            .write_file(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log!("editor"; "wrote {}", path.display());
    }
    Ok(summary)
}

fn drain_events(rx: &Receiver<EditorEvent>) {
    for event in rx.try_iter() {
        debug!("editor"; "{}", event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codec::Snapshot;
    use crate::relay::http::TestEndpoints;
    use crate::relay::memory::MemoryChannel;
    use crate::relay::{Envelope, Hub};

    const SCRIPT: &str = r#"
{"op": "insertRoot", "node": {"id": "page", "type": "div"}}
{"op": "insertChild", "parent": "page", "node": {"id": "title", "type": "h1", "label": "Welcome"}}
{"op": "property", "id": "title", "property": "margin", "value": "8"}
{"op": "remove", "id": "ghost"}
{"op": "viewport", "device": "mobile"}
{"op": "viewport", "width": 0}
"#;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_offline_replay_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("final.json");
        let steps = parse_script(SCRIPT).unwrap();

        let summary = replay(&runtime(), steps, None, Some(&out)).unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                changed: 3,
                unchanged: 1,
                failed: 1,
                nodes: 2
            }
        );

        let snapshot = Snapshot::read_file(&out).unwrap();
        let tree = snapshot.clone().into_tree();
        assert_eq!(tree.find("title").unwrap().css["margin"], "8px");
        assert_eq!(snapshot.metadata.screen_size.map(|v| v.width), Some(375.0));
    }

    #[test]
    fn test_replay_publishes_to_relay() {
        let hub = Arc::new(Hub::new());
        let observer = MemoryChannel::new("o");
        hub.accept(observer.boxed());
        let endpoints = TestEndpoints::start(Arc::clone(&hub));

        let runtime = runtime();
        let remote = connect(&runtime, &endpoints.url()).unwrap();
        replay(&runtime, parse_script(SCRIPT).unwrap(), Some(remote), None).unwrap();

        let kinds = observer.kinds();
        assert_eq!(kinds.iter().filter(|k| *k == "documentUpdate").count(), 3);
        assert_eq!(kinds.iter().filter(|k| *k == "actionUpdate").count(), 3);
        assert_eq!(kinds.iter().filter(|k| *k == "screenSize").count(), 1);

        let batch = observer
            .sent()
            .iter()
            .find_map(|text| match Envelope::from_json(text) {
                Some(Envelope::ActionsUpdate { actions, .. }) => Some(actions),
                _ => None,
            })
            .unwrap();
        assert_eq!(batch.len(), 3);
    }
}

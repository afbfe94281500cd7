//! `watch` command: mirror the relayed document.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::core::register_poller;
use crate::logger::{is_verbose, status_error, status_success, status_unchanged};
use crate::observer::{ObserverClient, Reduced, RenderReducer, outline, render_page};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Follow the relay until it closes the channel or Ctrl+C.
pub fn run_watch(config: &AppConfig, out: Option<&Path>) -> Result<()> {
    let reducer = Arc::new(RenderReducer::new());
    let client = ObserverClient::new(config.observer.relay_ws.as_str(), Arc::clone(&reducer));
    log!("observer"; "connecting to {}", client.url());
    register_poller();

    if let Some(path) = out {
        write_page(&reducer, path)?;
    }

    let received = client
        .run(|reduced| on_update(&reducer, reduced, out))
        .with_context(|| format!("observer channel {}", client.url()))?;

    log!("observer"; "channel closed after {}", plural_count(received, "message"));
    Ok(())
}

fn on_update(reducer: &RenderReducer, reduced: Reduced, out: Option<&Path>) {
    match reduced {
        Reduced::Document(nodes) => {
            status_success(&format!("document, {}", plural_count(nodes, "node")));
            if is_verbose()
                && let Some(snapshot) = reducer.snapshot()
            {
                debug!("observer"; "\n{}", outline(&snapshot.elements));
            }
        }
        Reduced::Viewport(v) => status_success(&format!("screen {}x{}", v.width, v.height)),
        Reduced::Passed(kind) => {
            status_unchanged(kind);
            return;
        }
        Reduced::Ignored => {
            debug!("observer"; "ignored undecodable message");
            return;
        }
    }

    if let Some(path) = out
        && let Err(e) = write_page(reducer, path)
    {
        status_error("render failed", &format!("{e:#}"));
    }
}

fn write_page(reducer: &RenderReducer, path: &Path) -> Result<()> {
    let page = render_page(reducer.snapshot().as_deref(), reducer.viewport());
    fs::write(path, page).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Codec, Viewport};
    use crate::model::{Node, Tree};
    use crate::relay::Envelope;

    #[test]
    fn test_rerenders_on_document_and_viewport() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let reducer = RenderReducer::new();

        write_page(&reducer, &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Waiting for a document"));

        let tree = Tree::new().insert_root(Node::with_id("hero", "section", "Hero"));
        let update = Envelope::document_update(&Codec::new().snapshot(&tree, None), 1);
        on_update(&reducer, reducer.reduce(&update.to_json()), Some(&path));
        assert!(fs::read_to_string(&path).unwrap().contains("<section id=\"hero\"></section>"));

        let resize = Envelope::screen_size(Viewport { width: 375.0, height: 812.0 }, 2);
        on_update(&reducer, reducer.reduce(&resize.to_json()), Some(&path));
        assert!(fs::read_to_string(&path).unwrap().contains("width: 375px;"));
    }
}

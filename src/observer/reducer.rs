//! Observer-side state: the last snapshot and the last screen size.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::codec::{Snapshot, Viewport};
use crate::relay::Envelope;

/// Effect of one inbound message on the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduced {
    /// Snapshot replaced; carries its node count.
    Document(usize),
    Viewport(Viewport),
    /// Well-formed envelope that carries no render state.
    Passed(&'static str),
    /// Undecodable, unknown, or rejected message.
    Ignored,
}

/// Holds exactly two values, each replaced wholesale.
///
/// Readers get an `Arc` to a complete value, never a partial update.
#[derive(Default)]
pub struct RenderReducer {
    snapshot: ArcSwapOption<Snapshot>,
    viewport: ArcSwapOption<Viewport>,
}

impl RenderReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observer-channel text frame into the state.
    pub fn reduce(&self, text: &str) -> Reduced {
        let Some(envelope) = Envelope::from_json(text) else {
            return Reduced::Ignored;
        };
        match envelope {
            Envelope::DocumentUpdate { document, .. } => match Snapshot::from_value(document) {
                Ok(snapshot) => {
                    let nodes = snapshot.node_count();
                    self.snapshot.store(Some(Arc::new(snapshot)));
                    Reduced::Document(nodes)
                }
                Err(_) => Reduced::Ignored,
            },
            Envelope::ScreenSize { width, height, .. } => match Viewport::new(width, height) {
                Ok(viewport) => {
                    self.viewport.store(Some(Arc::new(viewport)));
                    Reduced::Viewport(viewport)
                }
                Err(_) => Reduced::Ignored,
            },
            other => Reduced::Passed(other.kind()),
        }
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.load_full()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.load().as_deref().copied()
    }
}

//! Serialization codec - snapshots, action records and static markup.
//!
//! ```text
//! Tree --snapshot()--> Snapshot --JSON--> relay --JSON--> Snapshot --into_tree()--> Tree
//!   \--element_action()/property_action()--> Action (audit log + relay)
//!   \--markup()/stylesheet()/document()--> static HTML text
//! ```
//!
//! A `Codec` is an explicit value built at the composition root and handed to
//! whoever needs it; it carries the format version and the clock used to
//! stamp snapshots and actions.

mod action;
mod error;
mod markup;
mod snapshot;

pub use action::{Action, ActionData, ActionKind, ActionLog};
pub use error::CodecError;
pub use markup::{to_document, to_markup, to_stylesheet};
pub use snapshot::{FORMAT_VERSION, Metadata, Snapshot, Viewport, ViewportError};

use crate::core::now_millis;
use crate::model::{Node, Tree};

/// Snapshot/action factory.
#[derive(Debug, Clone)]
pub struct Codec {
    version: String,
    clock: fn() -> u64,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION.to_owned(),
            clock: now_millis,
        }
    }

    /// Replace the timestamp source (fixed clocks make encodings comparable).
    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Full, self-contained snapshot of `tree`.
    pub fn snapshot(&self, tree: &Tree, viewport: Option<Viewport>) -> Snapshot {
        Snapshot {
            elements: tree.roots().to_vec(),
            metadata: Metadata {
                version: self.version.clone(),
                timestamp: (self.clock)(),
                screen_size: viewport,
            },
        }
    }

    /// Structural or bulk-style edit record.
    pub fn element_action(
        &self,
        kind: ActionKind,
        element_id: impl Into<String>,
        data: Option<ActionData>,
    ) -> Action {
        Action::element(kind, element_id.into(), data, (self.clock)())
    }

    /// Single style property edit record.
    pub fn property_action(
        &self,
        element_id: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Action {
        Action::CssUpdate {
            element_id: element_id.into(),
            property: property.into(),
            value: value.into(),
            timestamp: (self.clock)(),
        }
    }

    pub fn markup(&self, nodes: &[Node]) -> String {
        to_markup(nodes)
    }

    pub fn stylesheet(&self, nodes: &[Node]) -> String {
        to_stylesheet(nodes)
    }

    pub fn document(&self, nodes: &[Node]) -> String {
        to_document(nodes)
    }
}

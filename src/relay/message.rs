//! Observer-channel envelopes and request-channel bodies.
//!
//! Every envelope is a JSON object tagged by `kind`:
//!
//! ```json
//! {"kind": "welcome", "message": "Connected to relay"}
//! {"kind": "tick", "timestamp": 1700000000000}
//! {"kind": "screenSize", "width": 375.0, "height": 812.0, "at": 1700000000000}
//! {"kind": "documentUpdate", "document": {...}, "at": 1700000000000}
//! ```
//!
//! Documents and actions travel as the JSON the editor posted; the relay
//! never reshapes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::Viewport;

/// Greeting sent to every newly accepted observer.
pub const WELCOME_TEXT: &str = "Connected to relay";

/// Message pushed from the relay to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Envelope {
    Welcome { message: String },
    Echo { message: String },
    Tick { timestamp: u64 },
    ScreenSize { width: f64, height: f64, at: u64 },
    DocumentUpdate { document: Value, at: u64 },
    ActionUpdate { action: Value, at: u64 },
    ActionsUpdate { actions: Vec<Value>, at: u64 },
}

impl Envelope {
    pub fn welcome() -> Self {
        Self::Welcome {
            message: WELCOME_TEXT.to_owned(),
        }
    }

    pub fn echo(message: impl Into<String>) -> Self {
        Self::Echo {
            message: message.into(),
        }
    }

    pub fn screen_size(viewport: Viewport, at: u64) -> Self {
        Self::ScreenSize {
            width: viewport.width,
            height: viewport.height,
            at,
        }
    }

    /// Test helper: wrap a typed snapshot.
    #[cfg(test)]
    pub fn document_update(snapshot: &crate::codec::Snapshot, at: u64) -> Self {
        Self::DocumentUpdate {
            document: serde_json::to_value(snapshot).unwrap(),
            at,
        }
    }

    /// Wire name of this envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::Echo { .. } => "echo",
            Self::Tick { .. } => "tick",
            Self::ScreenSize { .. } => "screenSize",
            Self::DocumentUpdate { .. } => "documentUpdate",
            Self::ActionUpdate { .. } => "actionUpdate",
            Self::ActionsUpdate { .. } => "actionsUpdate",
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

/// Response body of every ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestReply {
    pub fn delivered(count: usize) -> Self {
        Self {
            ok: true,
            delivered: Some(count),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            delivered: None,
            error: Some(error.into()),
        }
    }
}

//! Edit records and the session's append-only action log.
//!
//! Actions are audit records. State is always rebuilt from snapshots, never
//! by replaying actions.

use serde::{Deserialize, Serialize};

use crate::model::{Node, StyleMap};

/// Structural (and bulk style) edit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Remove,
    Move,
    Update,
}

/// One immutable edit record, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Action {
    Add {
        element_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ActionData>,
        timestamp: u64,
    },
    Remove {
        element_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ActionData>,
        timestamp: u64,
    },
    Move {
        element_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ActionData>,
        timestamp: u64,
    },
    Update {
        element_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ActionData>,
        timestamp: u64,
    },
    CssUpdate {
        element_id: String,
        property: String,
        value: String,
        timestamp: u64,
    },
}

/// Kind-specific payload of a structural action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<StyleMap>,
}

impl Action {
    pub(super) fn element(
        kind: ActionKind,
        element_id: String,
        data: Option<ActionData>,
        timestamp: u64,
    ) -> Self {
        match kind {
            ActionKind::Add => Self::Add { element_id, data, timestamp },
            ActionKind::Remove => Self::Remove { element_id, data, timestamp },
            ActionKind::Move => Self::Move { element_id, data, timestamp },
            ActionKind::Update => Self::Update { element_id, data, timestamp },
        }
    }

    /// Wire discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Move { .. } => "move",
            Self::Update { .. } => "update",
            Self::CssUpdate { .. } => "css-update",
        }
    }

    pub fn element_id(&self) -> &str {
        match self {
            Self::Add { element_id, .. }
            | Self::Remove { element_id, .. }
            | Self::Move { element_id, .. }
            | Self::Update { element_id, .. }
            | Self::CssUpdate { element_id, .. } => element_id,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Add { timestamp, .. }
            | Self::Remove { timestamp, .. }
            | Self::Move { timestamp, .. }
            | Self::Update { timestamp, .. }
            | Self::CssUpdate { timestamp, .. } => *timestamp,
        }
    }
}

// ============================================================================
// ActionLog
// ============================================================================

/// Append-only log of the actions taken in one authoring session.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.entries.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the history (new session).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! Document snapshots.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "elements": [{ "id": "div-1-x", "type": "div", "label": "Div", "children": [], "css": {}, "attributes": {} }],
//!   "metadata": { "version": "1.0.0", "timestamp": 1700000000000, "screenSize": { "width": 375, "height": 812 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CodecError;
use crate::model::{Node, Tree};

/// Snapshot format version.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Full copy of the document at one instant. Never a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub elements: Vec<Node>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: String,
    /// Milliseconds since epoch.
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<Viewport>,
}

impl Default for Metadata {
    /// Stand-in for snapshots sent without metadata.
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_owned(),
            timestamp: 0,
            screen_size: None,
        }
    }
}

impl Snapshot {
    /// Rehydrate the in-memory tree (identity on `elements`).
    pub fn into_tree(self) -> Tree {
        Tree::from_roots(self.elements)
    }

    pub fn node_count(&self) -> usize {
        self.elements.iter().map(Node::size).sum()
    }

    /// Compact JSON for transmission.
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON for files and inspection.
    pub fn to_json_pretty(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Decode a document that arrived as untyped JSON.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CodecError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn read_file(path: &Path) -> Result<Self, CodecError> {
        let text =
            fs::read_to_string(path).map_err(|e| CodecError::Io(path.to_path_buf(), e))?;
        Self::from_json(&text)
    }

    pub fn write_file(&self, path: &Path) -> Result<(), CodecError> {
        fs::write(path, self.to_json_pretty()?).map_err(|e| CodecError::Io(path.to_path_buf(), e))
    }
}

// ============================================================================
// Viewport
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Invalid width/height")]
pub struct ViewportError;

/// Render surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Both dimensions must be finite and strictly positive.
    pub fn new(width: f64, height: f64) -> Result<Self, ViewportError> {
        let viewport = Self { width, height };
        if viewport.is_valid() {
            Ok(viewport)
        } else {
            Err(ViewportError)
        }
    }

    pub fn is_valid(&self) -> bool {
        is_dimension(self.width) && is_dimension(self.height)
    }

    /// Same surface turned 90 degrees.
    pub fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Validate an untyped `{width, height}` body: both must be JSON numbers.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ViewportError> {
        let width = value.get("width").and_then(serde_json::Value::as_f64);
        let height = value.get("height").and_then(serde_json::Value::as_f64);
        match (width, height) {
            (Some(width), Some(height)) => Self::new(width, height),
            _ => Err(ViewportError),
        }
    }
}

fn is_dimension(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

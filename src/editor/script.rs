//! JSON-lines edit scripts for non-interactive sessions.
//!
//! One edit per line, tagged by `op`. Blank lines and `#` comments are
//! skipped.
//!
//! ```text
//! {"op": "insertRoot", "node": {"id": "page", "type": "div"}}
//! {"op": "insertChild", "parent": "page", "node": {"type": "span", "label": "Hello"}}
//! {"op": "property", "id": "page", "property": "padding", "value": "16"}
//! {"op": "viewport", "device": "mobile"}
//! ```

use serde::Deserialize;
use thiserror::Error;

use super::viewport::DevicePreset;
use crate::model::{AttributeMap, Node, StyleMap};

#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// One scripted edit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditStep {
    InsertRoot {
        node: NodeSpec,
    },
    InsertChild {
        parent: String,
        node: NodeSpec,
    },
    InsertSibling {
        after: String,
        node: NodeSpec,
    },
    Remove {
        id: String,
    },
    /// Re-parent `id`; no `parent` moves it to the root sequence.
    Move {
        id: String,
        #[serde(default)]
        parent: Option<String>,
    },
    /// Merge several style properties at once.
    Style {
        id: String,
        css: StyleMap,
    },
    /// Set one style property, as the properties panel does.
    Property {
        id: String,
        property: String,
        value: String,
    },
    Select {
        #[serde(default)]
        id: Option<String>,
    },
    Viewport {
        #[serde(default)]
        device: Option<DevicePreset>,
        width: Option<f64>,
        height: Option<f64>,
    },
    Rotate,
    /// Drop the document and the action history.
    Reset,
}

/// Node description; `id` and `label` are filled in when omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub css: StyleMap,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn into_node(self) -> Node {
        let label = self.label.unwrap_or_else(|| default_label(&self.kind));
        let node = match self.id {
            Some(id) => Node::with_id(id, self.kind, label),
            None => Node::new(self.kind, label),
        };
        let node = self.css.into_iter().fold(node, |node, (k, v)| node.style(k, v));
        let mut node = self
            .attributes
            .into_iter()
            .fold(node, |node, (k, v)| node.attribute(k, v));
        node.children = self
            .children
            .into_iter()
            .map(|spec| {
                let mut child = spec.into_node();
                child.parent = Some(node.id.clone());
                child
            })
            .collect();
        node
    }
}

/// Display names of the palette element types.
const PALETTE_LABELS: &[(&str, &str)] = &[
    ("div", "Div"),
    ("span", "Span"),
    ("p", "Paragraph"),
    ("h1", "Heading 1"),
    ("h2", "Heading 2"),
    ("button", "Button"),
    ("container", "Container"),
    ("flex", "Flex"),
    ("grid", "Grid"),
    ("section", "Section"),
    ("article", "Article"),
    ("aside", "Aside"),
    ("img", "Image"),
    ("video", "Video"),
    ("audio", "Audio"),
    ("iframe", "Iframe"),
    ("input", "Input"),
    ("textarea", "Textarea"),
    ("select", "Select"),
    ("checkbox", "Checkbox"),
    ("radio", "Radio"),
    ("label", "Label"),
];

/// Palette name for known types (`"h1"` -> `"Heading 1"`), otherwise the
/// type capitalized (`"nav"` -> `"Nav"`).
fn default_label(kind: &str) -> String {
    if let Some((_, label)) = PALETTE_LABELS.iter().find(|(k, _)| *k == kind) {
        return (*label).to_owned();
    }
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a whole script, reporting the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<EditStep>, ScriptError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| ScriptError {
                line: index + 1,
                source,
            })
        })
        .collect()
}

//! Document nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::now_millis;

/// Style property name -> style value.
pub type StyleMap = BTreeMap<String, String>;

/// Free-form markup attributes (`class`, `href`, ...).
pub type AttributeMap = BTreeMap<String, String>;

/// Length of the random part of a generated identifier.
const ID_SUFFIX_LEN: usize = 9;

/// One element of the document tree.
///
/// The in-memory shape is the wire shape: a snapshot's `elements` field
/// deserializes straight into `Vec<Node>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Category tag, rendered as the element name.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub children: Vec<Node>,
    /// Advisory back-reference, never consulted by tree operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "scalar_map")]
    pub css: StyleMap,
    #[serde(default, deserialize_with = "scalar_map")]
    pub attributes: AttributeMap,
}

impl Node {
    /// Create a node with a freshly generated identifier.
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::with_id(generate_id(&kind), kind, label)
    }

    /// Create a node with a caller-chosen identifier.
    pub fn with_id(id: impl Into<String>, kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            children: Vec::new(),
            parent: None,
            css: StyleMap::new(),
            attributes: AttributeMap::new(),
        }
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.css.insert(property.into(), value.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this node and its descendants depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Find `id` in this node's subtree (including the node itself).
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }
}

/// Read a string map that other writers may fill with numbers or booleans
/// (`{"opacity": 1}`). Those are kept in their JSON spelling; `null`, arrays
/// and objects are dropped.
fn scalar_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect())
}

/// Generate a `type-timestamp-random` identifier.
pub fn generate_id(kind: &str) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{kind}-{}-{}", now_millis(), &random[..ID_SUFFIX_LEN])
}

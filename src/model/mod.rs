//! Document model - ordered node tree with per-node style maps.
//!
//! # Module Structure
//!
//! - `node` - `Node` type and identifier generation
//! - `tree` - `Tree` and its copy-on-edit structural operations
//! - `style` - style value normalization for the properties editor

mod node;
mod style;
mod tree;

pub use node::{AttributeMap, Node, StyleMap, generate_id};
pub use style::normalize_value;
pub use tree::Tree;

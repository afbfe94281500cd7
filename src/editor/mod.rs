//! Authoring side: the session that edits the tree and the plumbing that
//! mirrors it to the relay.
//!
//! ```text
//! EditStep --apply()--> EditorSession --commit--> Publisher --HTTP--> relay
//!                            |                ViewportPublisher --/
//!                            \--EditorEvent--> listeners
//! ```

mod client;
mod publisher;
mod script;
mod session;
mod viewport;

pub use client::{ClientError, RelayClient};
pub use publisher::Publisher;
pub use script::{EditStep, NodeSpec, ScriptError, parse_script};
pub use session::{Applied, EditorEvent, EditorEvents, EditorSession};
pub use viewport::{DevicePreset, ScreenSelector, ViewportPublisher};

//! Observer side: mirror the relayed document and render it.
//!
//! ```text
//! relay --WebSocket--> ObserverClient --reduce()--> RenderReducer --> render_page()
//! ```

mod client;
mod reducer;
mod render;

pub use client::ObserverClient;
pub use reducer::{Reduced, RenderReducer};
pub use render::{camel_case, frame_size, native_style, outline, render_page};

//! Configuration section definitions.
//!
//! Each module corresponds to a section in `docrelay.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `relay`    | `[relay]`      | Ingestion endpoints, observer channels   |
//! | `editor`   | `[editor]`     | Where authoring sessions publish         |
//! | `observer` | `[observer]`   | Where observers connect                  |

mod editor;
mod observer;
mod relay;

pub use editor::EditorConfig;
pub use observer::ObserverConfig;
pub use relay::RelayConfig;

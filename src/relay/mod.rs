//! Relay - fans snapshots and actions out to render observers.
//!
//! ```text
//! editor --HTTP POST--> http::route --> Hub --WebSocket--> observers
//!                                        ^
//!                    RelayActor ---------+ (admission, heartbeat)
//! ```
//!
//! The relay keeps no document state. Observers that connect late see
//! nothing until the next ingestion.

mod actor;
mod channel;
mod error;
pub mod http;
mod hub;
mod lifecycle;
pub mod message;
mod socket;

pub use actor::{RelayActor, RelayMsg};
pub use channel::{Inbound, ObserverChannel, WsChannel};
pub use error::RelayError;
pub use hub::Hub;
pub use lifecycle::{BoundRelay, bind, bind_with_retry};
pub use message::{Envelope, IngestReply};

#[cfg(test)]
pub(crate) use channel::memory;

//! Observer channels.
//!
//! The hub only talks to `ObserverChannel`s; `WsChannel` is the real
//! WebSocket-backed one.

use std::io::ErrorKind;
use std::net::TcpStream;

use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::RelayError;

/// Result of one non-blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    /// Nothing to read right now (also binary/ping/pong frames).
    Idle,
    Closed,
}

/// One persistent duplex connection to a render observer.
pub trait ObserverChannel: Send {
    /// Whether writes can still be attempted.
    fn is_open(&self) -> bool;

    /// Queue one text frame. An error means the channel is gone.
    fn send_text(&mut self, text: &str) -> Result<(), RelayError>;

    /// Non-blocking read of the next inbound frame.
    fn poll(&mut self) -> Inbound;

    fn close(&mut self);

    /// Peer description for logs.
    fn peer(&self) -> &str;
}

/// WebSocket observer over a non-blocking TCP stream.
pub struct WsChannel {
    ws: WebSocket<TcpStream>,
    peer: String,
}

impl WsChannel {
    /// Run the server handshake on a blocking stream, then switch it to
    /// non-blocking for polling reads.
    pub fn accept(stream: TcpStream) -> Result<Self, RelayError> {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_owned());
        let ws = tungstenite::accept(stream).map_err(|e| RelayError::Handshake(e.to_string()))?;
        ws.get_ref().set_nonblocking(true)?;
        Ok(Self { ws, peer })
    }
}

fn would_block(err: &tungstenite::Error) -> bool {
    matches!(err, tungstenite::Error::Io(e) if e.kind() == ErrorKind::WouldBlock)
}

impl ObserverChannel for WsChannel {
    fn is_open(&self) -> bool {
        self.ws.can_write()
    }

    fn send_text(&mut self, text: &str) -> Result<(), RelayError> {
        if !self.ws.can_write() {
            return Err(RelayError::Closed);
        }
        match self.ws.send(Message::Text(text.to_owned().into())) {
            Ok(()) => Ok(()),
            // Frame is buffered; the next read or write flushes it
            Err(ref e) if would_block(e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn poll(&mut self) -> Inbound {
        match self.ws.read() {
            Ok(Message::Text(text)) => Inbound::Text(text.as_str().to_owned()),
            Ok(Message::Close(_)) => Inbound::Closed,
            Ok(_) => Inbound::Idle,
            Err(ref e) if would_block(e) => Inbound::Idle,
            Err(_) => Inbound::Closed,
        }
    }

    fn close(&mut self) {
        let _ = self.ws.close(None);
        let _ = self.ws.flush();
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}

/// In-memory channel for driving the hub in tests.
#[cfg(test)]
pub mod memory {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{Inbound, ObserverChannel, RelayError};

    #[derive(Default)]
    struct State {
        closed: bool,
        sent: Vec<String>,
        inbox: VecDeque<String>,
    }

    /// Cloneable handle: one clone goes to the hub, the test keeps another.
    #[derive(Clone, Default)]
    pub struct MemoryChannel {
        state: Arc<Mutex<State>>,
        peer: String,
    }

    impl MemoryChannel {
        pub fn new(peer: &str) -> Self {
            Self {
                state: Arc::default(),
                peer: peer.to_owned(),
            }
        }

        pub fn boxed(&self) -> Box<dyn ObserverChannel> {
            Box::new(self.clone())
        }

        /// Close from the observer's side.
        pub fn disconnect(&self) {
            self.state.lock().closed = true;
        }

        /// Queue a frame as if the observer had sent it.
        pub fn push_inbound(&self, text: &str) {
            self.state.lock().inbox.push_back(text.to_owned());
        }

        pub fn sent(&self) -> Vec<String> {
            self.state.lock().sent.clone()
        }

        /// `kind` of every received envelope, in order.
        pub fn kinds(&self) -> Vec<String> {
            self.sent()
                .iter()
                .filter_map(|text| serde_json::from_str::<serde_json::Value>(text).ok())
                .filter_map(|value| value["kind"].as_str().map(str::to_owned))
                .collect()
        }
    }

    impl ObserverChannel for MemoryChannel {
        fn is_open(&self) -> bool {
            !self.state.lock().closed
        }

        fn send_text(&mut self, text: &str) -> Result<(), RelayError> {
            let mut state = self.state.lock();
            if state.closed {
                return Err(RelayError::Closed);
            }
            state.sent.push(text.to_owned());
            Ok(())
        }

        fn poll(&mut self) -> Inbound {
            let mut state = self.state.lock();
            match state.inbox.pop_front() {
                Some(text) => Inbound::Text(text),
                None if state.closed => Inbound::Closed,
                None => Inbound::Idle,
            }
        }

        fn close(&mut self) {
            self.state.lock().closed = true;
        }

        fn peer(&self) -> &str {
            &self.peer
        }
    }
}

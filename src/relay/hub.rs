//! Broadcast hub - the registry of open observer channels.
//!
//! The hub owns no document state. Every ingestion wraps its payload, exactly
//! as posted, in an envelope and fans it out synchronously, so the returned `delivered` count
//! is exact as of the moment the call returns.
//!
//! ```text
//! POST /updateDocument --> Hub::ingest_snapshot --> [ch1, ch2, ch3] --> delivered: 3
//! heartbeat ---------------> Hub::tick
//! observer text ----------> Hub::poll_inbound --> echo to sender
//! ```

use parking_lot::Mutex;

use super::channel::{Inbound, ObserverChannel};
use super::message::Envelope;
use serde_json::Value;

use crate::codec::{Viewport, ViewportError};
use crate::core::now_millis;
use crate::debug;
use crate::utils::plural::plural_count;

pub struct Hub {
    channels: Mutex<Vec<Box<dyn ObserverChannel>>>,
    clock: fn() -> u64,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(Vec::new()),
            clock: now_millis,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Register an observer and greet it. Nothing sent before this point is
    /// replayed.
    pub fn accept(&self, mut channel: Box<dyn ObserverChannel>) -> bool {
        // Greeting and registration under one lock: once the observer sees
        // the welcome, later broadcasts include it.
        let mut channels = self.channels.lock();
        if let Err(e) = channel.send_text(&Envelope::welcome().to_json()) {
            crate::log!("ws"; "failed to greet {}: {}", channel.peer(), e);
            return false;
        }
        debug!("ws"; "observer {} connected (total: {})", channel.peer(), channels.len() + 1);
        channels.push(channel);
        true
    }

    /// Send `envelope` to every open channel, pruning the rest.
    ///
    /// Returns the number of channels written to.
    pub fn broadcast(&self, envelope: &Envelope) -> usize {
        let text = envelope.to_json();
        let mut channels = self.channels.lock();
        let mut delivered = 0;

        channels.retain_mut(|channel| {
            if !channel.is_open() {
                debug!("ws"; "observer {} closed", channel.peer());
                return false;
            }
            match channel.send_text(&text) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(e) => {
                    debug!("ws"; "observer {} dropped: {}", channel.peer(), e);
                    false
                }
            }
        });

        debug!("ws"; "{} -> {}", envelope.kind(), plural_count(delivered, "observer"));
        delivered
    }

    pub fn ingest_snapshot(&self, document: Value) -> usize {
        self.broadcast(&Envelope::DocumentUpdate {
            document,
            at: (self.clock)(),
        })
    }

    pub fn ingest_action(&self, action: Value) -> usize {
        self.broadcast(&Envelope::ActionUpdate {
            action,
            at: (self.clock)(),
        })
    }

    pub fn ingest_actions(&self, actions: Vec<Value>) -> usize {
        self.broadcast(&Envelope::ActionsUpdate {
            actions,
            at: (self.clock)(),
        })
    }

    /// Broadcast a new render surface size; both sides must be finite and
    /// positive.
    pub fn ingest_viewport(&self, width: f64, height: f64) -> Result<usize, ViewportError> {
        let viewport = Viewport::new(width, height)?;
        Ok(self.broadcast(&Envelope::screen_size(viewport, (self.clock)())))
    }

    /// Heartbeat pulse.
    pub fn tick(&self) -> usize {
        self.broadcast(&Envelope::Tick {
            timestamp: (self.clock)(),
        })
    }

    /// Drain inbound frames from every channel, echoing text back to its
    /// sender. Returns the number of echoes sent.
    pub fn poll_inbound(&self) -> usize {
        let mut channels = self.channels.lock();
        let mut echoed = 0;

        channels.retain_mut(|channel| {
            loop {
                match channel.poll() {
                    Inbound::Text(text) => {
                        if channel.send_text(&Envelope::echo(text).to_json()).is_err() {
                            return false;
                        }
                        echoed += 1;
                    }
                    Inbound::Idle => return true,
                    Inbound::Closed => {
                        debug!("ws"; "observer {} disconnected", channel.peer());
                        return false;
                    }
                }
            }
        });

        echoed
    }

    /// Number of registered channels (closed ones linger until the next
    /// broadcast or poll).
    pub fn len(&self) -> usize {
        self.channels.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close and forget every channel.
    pub fn close_all(&self) {
        let mut channels = self.channels.lock();
        for mut channel in channels.drain(..) {
            channel.close();
        }
    }
}

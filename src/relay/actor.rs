//! Relay actor - observer admission and heartbeat.
//!
//! ```text
//! acceptor --[AddClient]--> RelayActor --[handshake]--> Hub
//!                               |
//!                               +--[every heartbeat]--> Hub::tick
//! reader thread --[100ms]--> Hub::poll_inbound (echo, prune)
//! ```

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use super::channel::WsChannel;
use super::hub::Hub;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// How often the reader thread polls observers for inbound frames.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Messages for the relay actor.
#[derive(Debug)]
pub enum RelayMsg {
    /// Raw stream from the acceptor, not yet upgraded.
    AddClient(TcpStream),
    Shutdown,
}

pub struct RelayActor {
    rx: mpsc::Receiver<RelayMsg>,
    hub: Arc<Hub>,
    heartbeat: Duration,
}

impl RelayActor {
    pub fn new(rx: mpsc::Receiver<RelayMsg>, hub: Arc<Hub>, heartbeat: Duration) -> Self {
        Self { rx, hub, heartbeat }
    }

    /// Run until `Shutdown` arrives or every sender is dropped.
    pub async fn run(mut self) {
        let stop = Arc::new(AtomicBool::new(false));
        let reader = {
            let hub = Arc::clone(&self.hub);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || inbound_loop(&hub, &stop))
        };

        // First pulse one full period after start
        let start = tokio::time::Instant::now() + self.heartbeat;
        let mut ticker = tokio::time::interval_at(start, self.heartbeat);

        loop {
            tokio::select! {
                msg = self.rx.recv() => match msg {
                    Some(RelayMsg::AddClient(stream)) => self.add_client(stream),
                    Some(RelayMsg::Shutdown) | None => break,
                },
                _ = ticker.tick() => {
                    let delivered = self.hub.tick();
                    debug!("ws"; "tick to {}", plural_count(delivered, "observer"));
                }
            }
        }

        debug!("ws"; "shutting down");
        stop.store(true, Ordering::SeqCst);
        let _ = reader.join();
        self.hub.close_all();
    }

    /// Upgrade off the actor loop so a slow handshake cannot delay ticks.
    fn add_client(&self, stream: TcpStream) {
        let hub = Arc::clone(&self.hub);
        tokio::task::spawn_blocking(move || match WsChannel::accept(stream) {
            Ok(channel) => {
                hub.accept(Box::new(channel));
            }
            Err(e) => log!("ws"; "{}", e),
        });
    }
}

fn inbound_loop(hub: &Hub, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        std::thread::sleep(POLL_INTERVAL);
        let echoed = hub.poll_inbound();
        if echoed > 0 {
            debug!("ws"; "echoed {}", plural_count(echoed, "message"));
        }
    }
}

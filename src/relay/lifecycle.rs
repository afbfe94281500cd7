//! Relay lifecycle: bind, run, shut down.

use std::net::{IpAddr, SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::{self, Receiver};
use tiny_http::Server;
use tokio::sync::mpsc;

use super::actor::{RelayActor, RelayMsg};
use super::http::{Cors, run_request_loop};
use super::hub::Hub;
use super::socket::{self, MAX_PORT_RETRIES};
use super::RelayError;
use crate::config::RelayConfig;
use crate::core::register_server;
use crate::log;

/// Bounded queue between the acceptor and the actor.
const ACTOR_QUEUE: usize = 64;

/// Bind to the specified interface and port, with automatic port retry.
///
/// `reserved` (the configured observer port) is never taken, so observers
/// using the default URL cannot end up talking to the HTTP server.
pub fn bind_with_retry(
    interface: IpAddr,
    base_port: u16,
    reserved: u16,
) -> Result<(Server, SocketAddr), RelayError> {
    let mut last_error = format!("port {reserved} is reserved for observers");

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        if port == reserved {
            continue;
        }
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("relay"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(RelayError::Bind {
        service: "ingestion endpoints",
        attempts: MAX_PORT_RETRIES,
        first: base_port,
        last: base_port.saturating_add(MAX_PORT_RETRIES - 1),
        reason: last_error,
    })
}

/// Both listeners bound, ready to serve.
pub struct BoundRelay {
    server: Arc<Server>,
    addr: SocketAddr,
    listener: TcpListener,
    ws_port: u16,
    shutdown_rx: Receiver<()>,
    config: Arc<RelayConfig>,
}

/// Bind the HTTP server and the observer port, and register for Ctrl+C.
pub fn bind(config: Arc<RelayConfig>) -> Result<BoundRelay> {
    let (server, addr) = bind_with_retry(config.interface, config.port, config.ws_port)?;
    let (listener, ws_port) = socket::bind_listener(config.interface, config.ws_port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    Ok(BoundRelay {
        server,
        addr,
        listener,
        ws_port,
        shutdown_rx,
        config,
    })
}

impl BoundRelay {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn ws_port(&self) -> u16 {
        self.ws_port
    }

    /// Serve until Ctrl+C (blocking).
    pub fn run(self) -> Result<()> {
        let hub = Arc::new(Hub::new());
        let (tx, rx) = mpsc::channel(ACTOR_QUEUE);

        let acceptor = socket::spawn_acceptor(self.listener, tx.clone())?;
        forward_shutdown(self.shutdown_rx, tx);
        let actor = spawn_actor(rx, Arc::clone(&hub), self.config.heartbeat());

        let cors = Arc::new(Cors::new(self.config.allowed_origins.clone()));
        run_request_loop(&self.server, &hub, &cors, self.config.workers)?;

        wait_for_shutdown(actor);
        let _ = acceptor.join();
        Ok(())
    }
}

/// Turn the Ctrl+C signal into an actor message.
fn forward_shutdown(shutdown_rx: Receiver<()>, tx: mpsc::Sender<RelayMsg>) {
    thread::spawn(move || {
        if shutdown_rx.recv().is_ok() {
            let _ = tx.blocking_send(RelayMsg::Shutdown);
        }
    });
}

/// Run the relay actor on its own runtime thread.
pub fn spawn_actor(rx: mpsc::Receiver<RelayMsg>, hub: Arc<Hub>, heartbeat: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log!("error"; "failed to create tokio runtime: {}", e);
                return;
            }
        };
        rt.block_on(RelayActor::new(rx, hub, heartbeat).run());
    })
}

/// Wait for the actor to close its observers (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

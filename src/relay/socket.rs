//! Observer-channel acceptor.
//!
//! Raw streams are handed to the relay actor, which performs the WebSocket
//! handshake.

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::mpsc;

use super::RelayError;
use super::actor::RelayMsg;
use crate::{debug, log};

/// Maximum port retry attempts
pub const MAX_PORT_RETRIES: u16 = 10;

/// Bind the observer port, moving up one port at a time while in use.
///
/// Port 0 asks the OS for any free port.
pub fn bind_listener(interface: IpAddr, base_port: u16) -> Result<(TcpListener, u16), RelayError> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                if offset > 0 {
                    log!("ws"; "port {} in use, using {} instead", base_port, actual_port);
                }
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(RelayError::Bind {
        service: "observer channel",
        attempts: MAX_PORT_RETRIES,
        first: base_port,
        last: base_port.saturating_add(MAX_PORT_RETRIES - 1),
        reason: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}

/// Accept observers on `listener` until the actor goes away or shutdown is
/// requested.
pub fn spawn_acceptor(
    listener: TcpListener,
    tx: mpsc::Sender<RelayMsg>,
) -> Result<JoinHandle<()>, RelayError> {
    listener.set_nonblocking(true)?;

    Ok(thread::spawn(move || {
        loop {
            match listener.accept() {
                Ok((stream, addr)) => {
                    debug!("ws"; "connection from {}", addr);

                    // Handshake runs in blocking mode
                    let _ = stream.set_nonblocking(false);

                    if tx.blocking_send(RelayMsg::AddClient(stream)).is_err() {
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    if tx.is_closed() || crate::core::is_shutdown() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    log!("ws"; "accept error: {}", e);
                    thread::sleep(Duration::from_millis(100));
                }
            }
        }
    }))
}

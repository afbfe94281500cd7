//! Observer connection to the relay.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::reducer::{Reduced, RenderReducer};
use crate::core::is_shutdown;
use crate::debug;
use crate::relay::RelayError;

/// How often a blocked read wakes up to check for shutdown.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Feeds every frame from one relay channel into a shared reducer.
pub struct ObserverClient {
    url: String,
    reducer: Arc<RenderReducer>,
}

impl ObserverClient {
    pub fn new(url: impl Into<String>, reducer: Arc<RenderReducer>) -> Self {
        Self {
            url: url.into(),
            reducer,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect and consume frames until the relay closes the channel or
    /// shutdown is requested. `on_update` sees the effect of each text frame.
    ///
    /// Returns the number of text frames received.
    pub fn run(&self, mut on_update: impl FnMut(Reduced)) -> Result<usize, RelayError> {
        let (mut ws, _) = tungstenite::connect(self.url.as_str())?;
        if let MaybeTlsStream::Plain(stream) = ws.get_ref() {
            stream.set_read_timeout(Some(READ_TIMEOUT))?;
        }

        let mut received = 0;
        loop {
            if is_shutdown() {
                close(&mut ws);
                break;
            }
            match ws.read() {
                Ok(Message::Text(text)) => {
                    received += 1;
                    on_update(self.reducer.reduce(text.as_str()));
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => break,
                Err(tungstenite::Error::Io(e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!("observer"; "channel {} closed after {} messages", self.url, received);
        Ok(received)
    }
}

fn close(ws: &mut WebSocket<MaybeTlsStream<TcpStream>>) {
    let _ = ws.close(None);
    let _ = ws.flush();
}

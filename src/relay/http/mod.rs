//! Request channel - the HTTP ingestion endpoints.
//!
//! | Endpoint              | Body                      |
//! |-----------------------|---------------------------|
//! | `GET /health`         | -                         |
//! | `POST /setScreenSize` | `{width, height}`         |
//! | `POST /updateDocument`| snapshot                  |
//! | `POST /updateAction`  | action                    |
//! | `POST /updateActions` | `{actions: [...]}`        |

mod response;
mod route;

pub use route::{Reply, route};

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use super::hub::Hub;
use crate::log;

/// Origins allowed to call the endpoints from a browser.
#[derive(Debug, Clone, Default)]
pub struct Cors {
    allowed: Vec<String>,
}

impl Cors {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// Echo back `origin` if it is allowed.
    pub fn allow<'a>(&self, origin: Option<&'a str>) -> Option<&'a str> {
        origin.filter(|origin| self.allowed.iter().any(|allowed| allowed == origin))
    }
}

/// Serve requests until the server is unblocked (blocking).
pub fn run_request_loop(server: &Server, hub: &Arc<Hub>, cors: &Arc<Cors>, workers: usize) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let hub = Arc::clone(hub);
        let cors = Arc::clone(cors);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &hub, &cors) {
                log!("http"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(mut request: Request, hub: &Hub, cors: &Cors) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .context("failed to read request body")?;

    let method = request.method().as_str().to_owned();
    let url = request.url().to_owned();
    let origin = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Origin"))
        .map(|h| h.value.as_str().to_owned());

    let reply = route(hub, &method, &url, &body);
    log!("http"; "{} {} {}", method, url, reply.status);

    let headers = response::cors_headers(cors.allow(origin.as_deref()), method == "OPTIONS");
    response::send_reply(request, reply, headers)
}

/// Ingestion endpoints on an ephemeral localhost port, stopped on drop.
#[cfg(test)]
pub struct TestEndpoints {
    server: Arc<Server>,
    addr: std::net::SocketAddr,
    handle: Option<std::thread::JoinHandle<()>>,
}

#[cfg(test)]
impl TestEndpoints {
    pub fn start(hub: Arc<Hub>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let loop_server = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            let cors = Arc::new(Cors::default());
            run_request_loop(&loop_server, &hub, &cors, 2).unwrap();
        });
        Self {
            server,
            addr,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

#[cfg(test)]
impl Drop for TestEndpoints {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

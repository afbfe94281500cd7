//! HTTP client for the relay's ingestion endpoints.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;

use crate::codec::{Action, Snapshot, Viewport};
use crate::debug;
use crate::relay::IngestReply;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("relay answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("relay rejected {url}: {message}")]
    Rejected { url: String, message: String },
}

#[derive(Serialize)]
struct BatchRef<'a> {
    actions: &'a [Action],
}

/// Client for one relay. Clones share the connection pool and the
/// connection flag.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    connected: Arc<AtomicBool>,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build().map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Push a full snapshot. Returns the relay's `delivered` count.
    pub async fn send_document(&self, snapshot: &Snapshot) -> Result<usize, ClientError> {
        self.post("/updateDocument", snapshot).await
    }

    pub async fn send_action(&self, action: &Action) -> Result<usize, ClientError> {
        self.post("/updateAction", action).await
    }

    pub async fn send_actions(&self, actions: &[Action]) -> Result<usize, ClientError> {
        self.post("/updateActions", &BatchRef { actions }).await
    }

    pub async fn send_viewport(&self, viewport: Viewport) -> Result<usize, ClientError> {
        self.post("/setScreenSize", &viewport).await
    }

    /// `GET /health`; updates the connection flag.
    pub async fn check_health(&self) -> bool {
        let url = self.url("/health");
        let healthy = match self.http.get(&url).send().await {
            Ok(response) => response
                .json::<serde_json::Value>()
                .await
                .map(|body| body["status"] == "ok")
                .unwrap_or(false),
            Err(e) => {
                debug!("editor"; "health check failed: {}", e);
                false
            }
        };
        self.connected.store(healthy, Ordering::SeqCst);
        healthy
    }

    /// Result of the last health check.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<usize, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let reply = response.json::<IngestReply>().await.ok();
        match reply {
            Some(reply) if status.is_success() && reply.ok => Ok(reply.delivered.unwrap_or(0)),
            Some(IngestReply {
                error: Some(message),
                ..
            }) => Err(ClientError::Rejected { url, message }),
            _ => Err(ClientError::Status {
                url,
                status: status.as_u16(),
            }),
        }
    }
}

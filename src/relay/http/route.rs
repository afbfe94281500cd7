//! Request routing, independent of the HTTP server.

use serde::Serialize;
use serde_json::{Value, json};

use crate::codec::Viewport;
use crate::relay::RelayError;
use crate::relay::hub::Hub;
use crate::relay::message::IngestReply;

/// Status code and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    fn json(status: u16, body: impl Serialize) -> Self {
        Self {
            status,
            body: Some(serde_json::to_value(body).unwrap_or(Value::Null)),
        }
    }

    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn ingested(delivered: usize) -> Self {
        Self::json(200, IngestReply::delivered(delivered))
    }

    fn rejected(status: u16, error: &RelayError) -> Self {
        Self::json(status, IngestReply::failed(error.to_string()))
    }
}

/// Dispatch one request against the hub.
pub fn route(hub: &Hub, method: &str, url: &str, body: &str) -> Reply {
    let path = url.split(['?', '#']).next().unwrap_or(url);

    match (method, path) {
        ("OPTIONS", _) => Reply::empty(204),
        ("GET" | "HEAD", "/health") => Reply::json(200, json!({ "status": "ok" })),
        ("POST", "/setScreenSize") => ingest(body, |value| {
            let viewport = Viewport::from_value(&value)?;
            Ok(hub.ingest_viewport(viewport.width, viewport.height)?)
        }),
        ("POST", "/updateDocument") => ingest(body, |document| {
            Ok(hub.ingest_snapshot(object(document, "document must be a JSON object")?))
        }),
        ("POST", "/updateAction") => ingest(body, |action| {
            Ok(hub.ingest_action(object(action, "action must be a JSON object")?))
        }),
        ("POST", "/updateActions") => ingest(body, |batch| Ok(hub.ingest_actions(action_list(batch)?))),
        _ => Reply::json(404, IngestReply::failed("Not found")),
    }
}

/// Parse the body as JSON, hand it to `apply`, and map any failure to a 400.
///
/// Only viewports are decoded into a type; documents and actions are
/// shape-checked and forwarded as parsed.
fn ingest<F>(body: &str, apply: F) -> Reply
where
    F: FnOnce(Value) -> Result<usize, RelayError>,
{
    let result = serde_json::from_str::<Value>(body)
        .map_err(RelayError::from)
        .and_then(apply);
    match result {
        Ok(delivered) => Reply::ingested(delivered),
        Err(e) => Reply::rejected(400, &e),
    }
}

fn object(value: Value, problem: &'static str) -> Result<Value, RelayError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(RelayError::Shape(problem))
    }
}

/// `{"actions": [...]}`; a missing list is an empty batch.
fn action_list(batch: Value) -> Result<Vec<Value>, RelayError> {
    let Value::Object(mut fields) = batch else {
        return Err(RelayError::Shape("batch must be a JSON object"));
    };
    match fields.remove("actions") {
        None => Ok(Vec::new()),
        Some(Value::Array(actions)) => Ok(actions),
        Some(_) => Err(RelayError::Shape("actions must be an array")),
    }
}

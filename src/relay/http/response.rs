//! HTTP response helpers.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

use super::route::Reply;

const JSON: &str = "application/json; charset=utf-8";

/// Build a header from runtime strings; invalid bytes drop the header.
fn make_header(key: &str, value: &str) -> Option<Header> {
    Header::from_bytes(key, value).ok()
}

/// CORS headers for a permitted origin.
pub fn cors_headers(origin: Option<&str>, preflight: bool) -> Vec<Header> {
    let Some(origin) = origin else {
        return Vec::new();
    };
    let mut headers = vec![
        make_header("Access-Control-Allow-Origin", origin),
        make_header("Vary", "Origin"),
    ];
    if preflight {
        headers.push(make_header("Access-Control-Allow-Methods", "GET,HEAD,POST,OPTIONS"));
        headers.push(make_header("Access-Control-Allow-Headers", "Content-Type"));
    }
    headers.into_iter().flatten().collect()
}

/// Send a routed reply with any extra headers.
pub fn send_reply(request: Request, reply: Reply, extra: Vec<Header>) -> Result<()> {
    let body = reply.body.map(|value| value.to_string()).unwrap_or_default();
    let mut response = Response::from_string(body).with_status_code(StatusCode(reply.status));
    if reply.status != 204
        && let Some(header) = make_header("Content-Type", JSON)
    {
        response.add_header(header);
    }
    for header in extra {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 while shutting down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    let reply = Reply {
        status: 503,
        body: Some(serde_json::json!({ "ok": false, "error": "Shutting down" })),
    };
    send_reply(request, reply, Vec::new())
}

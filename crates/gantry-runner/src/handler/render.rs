// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error response rendering.
//!
//! Outside debug mode a renderer must not leak failure detail to the
//! client; the full report still reaches the log sink.

use gantry_worker::{Request, Response};

/// Builds a transmittable response for a failure.
pub trait ErrorRenderer: Send + Sync {
    /// Render a failure, optionally with its originating request.
    /// `debug` selects full detail versus a minimal safe body.
    fn render(&self, error: &anyhow::Error, request: Option<&Request>, debug: bool) -> Response;
}

/// A wait failure has no request context and maps to a client-side
/// status; a dispatch failure is the application's fault.
fn status_for(request: Option<&Request>) -> u16 {
    if request.is_none() { 400 } else { 500 }
}

/// Plain text renderer.
#[derive(Debug, Default)]
pub struct PlainTextRenderer;

impl ErrorRenderer for PlainTextRenderer {
    fn render(&self, error: &anyhow::Error, request: Option<&Request>, debug: bool) -> Response {
        let body = if debug {
            let mut body = format!("{error:#}");
            if let Some(req) = request {
                body.push_str(&format!("\n\nrequest: {} {}", req.method, req.uri));
                for (name, value) in &req.attributes {
                    body.push_str(&format!("\n  {name}: {value}"));
                }
            }
            body
        } else {
            "Internal Server Error".to_string()
        };

        Response::new(status_for(request))
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }
}

/// JSON renderer.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl ErrorRenderer for JsonRenderer {
    fn render(&self, error: &anyhow::Error, request: Option<&Request>, debug: bool) -> Response {
        let body = if debug {
            let mut document = serde_json::json!({ "error": format!("{error:#}") });
            if let Some(req) = request {
                document["request"] = serde_json::json!({
                    "method": req.method,
                    "uri": req.uri,
                    "attributes": req.attributes,
                });
            }
            document
        } else {
            serde_json::json!({ "error": "internal server error" })
        };

        Response::new(status_for(request))
            .with_header("Content-Type", "application/json")
            .with_body(body.to_string())
    }
}

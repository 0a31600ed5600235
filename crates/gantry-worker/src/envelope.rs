// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request and response envelopes exchanged with the relay.
//!
//! The runner treats both sides as opaque: it never inspects bodies or
//! headers beyond what logging needs. Bodies travel base64-encoded inside
//! the JSON envelope; the attribute map carries per-request metadata the
//! application layer may want to read.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An incoming request delivered by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request method (e.g. "GET").
    pub method: String,
    /// Request target URI.
    pub uri: String,
    /// Header name to value list.
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    /// Raw body bytes.
    #[serde(default, with = "body_encoding")]
    pub body: Bytes,
    /// Per-request metadata attached by the relay or the runner.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Monotonic marker set when dispatch begins. Never crosses the wire.
    #[serde(skip)]
    started_at: Option<Instant>,
}

impl Request {
    /// Create a request with the given method and URI.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers: BTreeMap::new(),
            body: Bytes::new(),
            attributes: BTreeMap::new(),
            started_at: None,
        }
    }

    /// Add a header value, preserving existing values for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set an attribute value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// First value of a header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Attribute value, if present.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    /// Stamp the dispatch start marker. Called once per request by the
    /// serve loop; later calls overwrite the marker.
    pub fn mark_started(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// The dispatch start marker, if stamped.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Time elapsed since dispatch began, if the marker was stamped.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|at| at.elapsed())
    }
}

/// A response to transmit back over the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// HTTP-style status code.
    pub status: u16,
    /// Header name to value list.
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    /// Raw body bytes.
    #[serde(default, with = "body_encoding")]
    pub body: Bytes,
}

impl Response {
    /// Create an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header value, preserving existing values for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Error payload carried by relay error frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub message: String,
}

mod body_encoding {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(&encoded)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}

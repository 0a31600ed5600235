// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport trait consumed by the serve loop.
//!
//! Wait failures are surfaced as values rather than panics so the loop
//! can still answer with an error response and run its cleanup pass.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::envelope::{Request, Response};
use crate::frame::{FrameError, MessageType};

/// Errors from transport operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The relay endpoint could not be reached.
    #[error("relay connect failed: {0}")]
    Connect(#[source] std::io::Error),

    /// The connect attempt exceeded the configured timeout.
    #[error("relay connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Frame-level failure on the wire.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A frame arrived but its payload did not decode as the expected envelope.
    #[error("malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The relay sent a frame type the worker cannot act on.
    #[error("unexpected {0:?} frame from relay")]
    Unexpected(MessageType),

    /// The relay reported an error condition for the current request.
    #[error("relay error: {0}")]
    Relay(String),
}

/// Outcome of waiting for the next request.
#[derive(Debug)]
pub enum WaitOutcome {
    /// A request to dispatch.
    Request(Request),
    /// No more requests will arrive; the loop should stop.
    Closed,
    /// The wait failed; the loop should answer with an error response
    /// and run cleanup without dispatching.
    Failed(TransportError),
}

/// Channel delivering requests to a worker and accepting its responses.
///
/// One request is in flight at a time; the loop never calls `wait_request`
/// again before `respond` has been attempted for the previous request.
#[async_trait]
pub trait Transport: Send {
    /// Block until the relay delivers a request, closes, or fails.
    async fn wait_request(&mut self) -> WaitOutcome;

    /// Transmit a response for the most recently delivered request.
    async fn respond(&mut self, response: &Response) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn wait_request(&mut self) -> WaitOutcome {
        (**self).wait_request().await
    }

    async fn respond(&mut self, response: &Response) -> Result<(), TransportError> {
        (**self).respond(response).await
    }
}

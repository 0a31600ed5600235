// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Application handler boundary.

use async_trait::async_trait;
use gantry_worker::{Request, Response};

/// The request-handling pipeline supplied by the application framework.
///
/// `start` and `shutdown` run once each, at serve-loop entry and exit.
/// `handle` may fail with any error; the loop renders such failures into
/// error responses instead of propagating them. `after_emit` is the
/// post-response hook, invoked once per iteration before state reset;
/// its failures are logged and never abort the loop.
#[async_trait]
pub trait Application: Send + Sync {
    /// One-time startup hook, called before the first request.
    async fn start(&self) -> anyhow::Result<()>;

    /// Dispatch a request through the handler chain.
    async fn handle(&self, request: &Request) -> anyhow::Result<Response>;

    /// Post-response hook. `response` is whatever was transmitted for the
    /// iteration, including error responses; `None` only when no response
    /// could be built at all.
    async fn after_emit(&self, response: Option<&Response>) -> anyhow::Result<()>;

    /// One-time shutdown hook, called after the loop stops.
    async fn shutdown(&self);
}

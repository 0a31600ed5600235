// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The serve loop.
//!
//! One loop drives a worker regardless of transport: wait for a request,
//! dispatch it, transmit the response, then run the cleanup pass. The
//! cleanup pass is unconditional. It runs on the happy path, on handler
//! failures, on wait failures, and on respond failures alike, because a
//! reused process that skips cleanup once starts its next request with
//! another request's state.
//!
//! Cleanup ordering is fixed: after-emit hook, then state reset, then
//! memory reclamation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use gantry_worker::{Request, Response, Transport, WaitOutcome};

use crate::application::Application;
use crate::error::{Result, RunnerError};
use crate::handler::ErrorHandler;
use crate::reclaim::Reclaim;
use crate::reset::StateResetter;

/// Request-serving loop over a transport and an application.
pub struct ServeLoop<T> {
    transport: T,
    application: Arc<dyn Application>,
    error_handler: Arc<ErrorHandler>,
    resetter: Arc<StateResetter>,
    reclaim: Arc<Reclaim>,
}

impl<T: Transport> ServeLoop<T> {
    /// Assemble a loop.
    pub fn new(
        transport: T,
        application: Arc<dyn Application>,
        error_handler: Arc<ErrorHandler>,
        resetter: Arc<StateResetter>,
        reclaim: Arc<Reclaim>,
    ) -> Self {
        Self {
            transport,
            application,
            error_handler,
            resetter,
            reclaim,
        }
    }

    /// Serve until the transport reports no more requests, then run the
    /// application shutdown hook once.
    pub async fn run(mut self) -> Result<()> {
        self.application
            .start()
            .await
            .map_err(RunnerError::Application)?;
        info!("serve loop started");

        loop {
            match self.transport.wait_request().await {
                WaitOutcome::Closed => break,
                WaitOutcome::Failed(err) => {
                    warn!(error = %err, "request wait failed");
                    let response = self
                        .error_handler
                        .handle(&anyhow::Error::new(err), None);
                    self.send(&response).await;
                    self.cleanup(Some(&response), None).await;
                }
                WaitOutcome::Request(mut request) => {
                    request.mark_started();
                    let response = match self.application.handle(&request).await {
                        Ok(response) => response,
                        Err(err) => self.error_handler.handle(&err, Some(&request)),
                    };
                    self.send(&response).await;
                    self.cleanup(Some(&response), Some(&request)).await;
                }
            }
        }

        info!("serve loop stopped");
        self.application.shutdown().await;
        Ok(())
    }

    /// Transmit a response. Send failures do not abort the loop; the
    /// cleanup pass for the iteration still has to run.
    async fn send(&mut self, response: &Response) {
        if let Err(err) = self.transport.respond(response).await {
            error!(error = %err, status = response.status, "response transmission failed");
        }
    }

    /// The unconditional per-iteration cleanup pass.
    async fn cleanup(&self, response: Option<&Response>, request: Option<&Request>) {
        if let Err(err) = self.application.after_emit(response).await {
            warn!(error = %err, "after-emit hook failed");
        }
        self.resetter.reset();
        self.reclaim.collect();

        if let Some(request) = request {
            if let Some(elapsed) = request.elapsed() {
                debug!(
                    method = %request.method,
                    uri = %request.uri,
                    status = response.map(|r| r.status),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request completed"
                );
            }
        }
    }
}

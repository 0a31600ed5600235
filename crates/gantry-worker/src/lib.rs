// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gantry worker transport - the relay side of a gantry worker process.
//!
//! A gantry worker is a long-lived process spawned and supervised by an
//! external application server (the "relay"). The relay delivers requests
//! to the worker one at a time over a stream socket and accepts one
//! response per request. This crate implements only that narrow contract:
//! the frame codec, the request/response envelopes, and the [`Transport`]
//! trait the runner's serve loop consumes.
//!
//! # Wire format
//!
//! Each message is one frame: a 4-byte big-endian payload length, a
//! 2-byte message type, then a JSON envelope. Types: Request=1,
//! Response=2, Error=3, Stop=4. A Stop frame or a clean EOF both mean
//! "no more requests". Bodies travel base64-encoded inside the envelope.
//!
//! # Quick Start
//!
//! ```ignore
//! use gantry_worker::{RelayWorker, WaitOutcome, WorkerConfig};
//!
//! let config = WorkerConfig::from_env()?;
//! let mut worker = RelayWorker::connect(&config).await?;
//!
//! loop {
//!     match worker.wait_request().await {
//!         WaitOutcome::Request(request) => {
//!             let response = handle(request).await;
//!             worker.respond(&response).await?;
//!         }
//!         WaitOutcome::Failed(err) => {
//!             worker.respond(&error_response(err)).await?;
//!         }
//!         WaitOutcome::Closed => break,
//!     }
//! }
//! ```
//!
//! Failure values returned from `wait_request` are deliberate: a bad
//! frame must not take the worker down, because the per-request cleanup
//! in the layer above still has to run for that iteration.

mod config;
mod envelope;
pub mod frame;
mod relay;
mod transport;

pub use config::{ConfigError, ENV_CONNECT_TIMEOUT_MS, ENV_RELAY, RelayEndpoint, WorkerConfig};
pub use envelope::{Request, Response};
pub use frame::{Frame, FrameError, MAX_FRAME_SIZE, MessageType};
pub use relay::{BoxedStream, RelayStream, RelayWorker};
pub use transport::{Transport, TransportError, WaitOutcome};

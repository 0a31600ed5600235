// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gantry runner - application bootstrap and serve loops for long-lived
//! worker processes.
//!
//! A gantry worker is spawned by an external application-server
//! supervisor and serves many requests over one process lifetime. This
//! crate owns the orchestration between the supervisor and the
//! application framework:
//!
//! - **Error handler swap**: a file-backed temporary handler covers
//!   container construction; the application's configured handler takes
//!   over the moment the container exists. Exactly one handler is the
//!   process-wide sink at any time.
//! - **Bootstrap**: an ordered list of named startup callables resolved
//!   from the container; the first failure aborts startup.
//! - **Mode selection**: the supervisor's mode flag, read once per
//!   process, picks the HTTP serve loop or the workflow worker loop.
//! - **The serve loop**: wait, dispatch, respond, clean up. The cleanup
//!   pass (after-emit hook, state reset, memory reclamation) runs after
//!   every iteration regardless of how it went, because singleton-scoped
//!   services are reused rather than recreated per request.
//! - **Delegating variants**: the gRPC and workflow loops register
//!   services or type declarations with external server objects and
//!   supply the same reset-and-reclaim finalizer.
//!
//! # Features
//!
//! - `workflow`: workflow worker mode. Without it, enabling workflow
//!   support on a runner fails at setup time.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use gantry_runner::{Container, ErrorHandler, HttpRunner, RunnerConfig, TracingSink,
//!     PlainTextRenderer, telemetry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RunnerConfig::from_env();
//!     telemetry::init(config.debug);
//!
//!     HttpRunner::new(config)
//!         .with_container_factory(|_config| {
//!             Ok(Container::builder()
//!                 .application(Arc::new(MyApp::new()))
//!                 .error_handler(Arc::new(ErrorHandler::new(
//!                     Arc::new(TracingSink),
//!                     Arc::new(PlainTextRenderer),
//!                 )))
//!                 .build())
//!         })
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

mod application;
mod bootstrap;
mod config;
mod container;
mod environment;
mod error;
mod groups;
mod grpc;
mod handler;
mod reclaim;
mod reset;
mod runner;
mod serve;
mod startup;
pub mod telemetry;

#[cfg(feature = "workflow")]
pub mod workflow;

pub use application::Application;
pub use bootstrap::{check_events, run_bootstrap};
pub use config::{ENV_DEBUG, ENV_ENVIRONMENT, ENV_ROOT, RunnerConfig};
pub use container::{Callable, Container, ContainerBuilder};
pub use environment::{
    ENV_MODE, MODE_HTTP, MODE_WORKFLOW, Mode, SUPPORTED_MODES, WorkerEnvironment,
};
pub use error::{Result, RunnerError};
pub use groups::{ConfigGroups, GroupError};
pub use grpc::{CallFinalizer, GrpcRunner, GrpcServer, GrpcService};
pub use handler::{
    ErrorHandler, ErrorRenderer, FileSink, JsonRenderer, LogSink, PlainTextRenderer, TracingSink,
    active_handler,
};
pub use reclaim::Reclaim;
pub use reset::{Resettable, StateResetter};
pub use runner::HttpRunner;
pub use serve::ServeLoop;
pub use startup::ContainerFactory;

// Relay-boundary types, re-exported for embedders.
pub use gantry_worker::{Request, Response, Transport, TransportError, WaitOutcome};

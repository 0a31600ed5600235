// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the runner.
//!
//! Everything in this enum is startup-fatal: the process has no useful
//! way to continue. Per-request failures never surface here; the serve
//! loop converts them into error responses and keeps going.

use thiserror::Error;

use crate::environment::SUPPORTED_MODES;

/// Runner errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// Config group loading failed.
    #[error("config group error: {0}")]
    Group(#[from] crate::groups::GroupError),

    /// Worker transport configuration was invalid.
    #[error("worker config error: {0}")]
    WorkerConfig(#[from] gantry_worker::ConfigError),

    /// The container factory failed.
    #[error("container construction failed: {0}")]
    Container(#[source] anyhow::Error),

    /// A required service is not registered in the container.
    #[error("service not found in container: {0}")]
    ServiceNotFound(&'static str),

    /// A bootstrap callable name did not resolve in the container.
    #[error("unknown bootstrap callable: {0}")]
    UnknownCallable(String),

    /// A bootstrap callable failed; startup is aborted.
    #[error("bootstrap callable {name} failed: {source}")]
    Bootstrap {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// An event-listener declaration did not resolve.
    #[error("event listener check failed: {0}")]
    Events(String),

    /// The application's lifecycle hook failed.
    #[error("application error: {0}")]
    Application(#[source] anyhow::Error),

    /// Workflow mode was requested but support was not enabled.
    #[error(
        "workflow support is disabled; call with_workflow_enabled(true) to enable workflow mode"
    )]
    WorkflowDisabled,

    /// Workflow support was requested but not compiled in.
    #[error("workflow support is not compiled in; rebuild with the `workflow` feature")]
    WorkflowSupportMissing,

    /// The mode flag read at startup names no known run loop.
    #[error("unsupported mode {mode:?}; supported modes: {SUPPORTED_MODES:?}")]
    UnsupportedMode { mode: String },

    /// Transport failure outside the serve loop (e.g. connect).
    #[error("transport error: {0}")]
    Transport(#[from] gantry_worker::TransportError),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using [`RunnerError`].
pub type Result<T> = std::result::Result<T, RunnerError>;

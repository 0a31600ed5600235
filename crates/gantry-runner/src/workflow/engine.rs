// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow engine boundary.
//!
//! The engine's task polling, scheduling, and wire protocol live in its
//! own SDK. The runner registers type declarations and a finalizer, then
//! hands over control.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Finalizer run by the engine after every completed activity.
pub type ActivityFinalizer = Arc<dyn Fn() + Send + Sync>;

/// Engine tuning knobs, passed through verbatim from the workflow config
/// group. The runner does not interpret any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerTuning {
    /// Task poller concurrency limit.
    pub max_concurrent_pollers: Option<u32>,
    /// Concurrent activity execution limit.
    pub max_concurrent_activities: Option<u32>,
    /// Concurrent workflow task limit.
    pub max_concurrent_workflows: Option<u32>,
    /// Per-second activity start rate cap.
    pub activities_per_second: Option<f64>,
    /// Session worker limit.
    pub max_session_workers: Option<u32>,
}

/// A worker created by the engine for one task queue.
pub trait WorkflowWorker: Send {
    /// Register a workflow type by name.
    fn register_workflow_type(&mut self, type_name: &str);

    /// Register an activity type by name.
    fn register_activity_type(&mut self, type_name: &str);

    /// Register the finalizer run after every completed activity.
    fn register_activity_finalizer(&mut self, finalize: ActivityFinalizer);
}

/// External workflow engine entry point.
#[async_trait]
pub trait WorkerFactory: Send + Sync {
    /// Create a worker bound to a task queue. Tuning is forwarded to the
    /// engine untouched.
    fn new_worker(&self, task_queue: &str, tuning: &WorkerTuning) -> Box<dyn WorkflowWorker>;

    /// Run the engine's own loop. Blocks until the engine connection is
    /// closed.
    async fn run(&self) -> anyhow::Result<()>;
}

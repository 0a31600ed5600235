// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow worker mode.
//!
//! In workflow mode the process is a task-queue worker: the engine SDK
//! owns polling and scheduling, and this module only registers the
//! declared workflow and activity types, wires the per-activity
//! finalizer, and calls the engine's blocking run loop.

mod declarations;
mod engine;

use serde::Deserialize;
use tracing::info;

pub use declarations::DeclarationProvider;
pub use engine::{ActivityFinalizer, WorkerFactory, WorkerTuning, WorkflowWorker};

use crate::config::RunnerConfig;
use crate::container::Container;
use crate::error::{Result, RunnerError};
use crate::groups::ConfigGroups;

/// Shape of the workflow config group file.
#[derive(Debug, Default, Deserialize)]
struct WorkflowGroup {
    #[serde(flatten)]
    declarations: DeclarationProvider,
    #[serde(default)]
    tuning: WorkerTuning,
}

/// Run the workflow worker loop.
///
/// Declarations registered in the container win over the config group;
/// the group file is the configuration-driven path for applications that
/// declare types as data. Tuning always comes from the group file.
pub(crate) async fn run_worker(config: &RunnerConfig, container: &Container) -> Result<()> {
    let groups = ConfigGroups::new(config);
    let group: WorkflowGroup = groups.load_or_default(&config.workflow_group)?;

    let declarations = match container.declarations() {
        Some(declarations) => declarations.clone(),
        None if !group.declarations.is_empty() => group.declarations.clone(),
        None => return Err(RunnerError::ServiceNotFound("DeclarationProvider")),
    };

    let factory = container
        .worker_factory()
        .ok_or(RunnerError::ServiceNotFound("WorkerFactory"))?;

    let mut worker = factory.new_worker(&config.task_queue, &group.tuning);

    for workflow in declarations.workflows() {
        worker.register_workflow_type(workflow);
    }
    for activity in declarations.activities() {
        worker.register_activity_type(activity);
    }

    let resetter = container.state_resetter();
    let reclaim = container.reclaim();
    worker.register_activity_finalizer(std::sync::Arc::new(move || {
        resetter.reset();
        reclaim.collect();
    }));

    info!(
        mode = "workflow",
        task_queue = %config.task_queue,
        workflows = declarations.workflows().len(),
        activities = declarations.activities().len(),
        "delegating to workflow engine"
    );
    factory.run().await.map_err(RunnerError::Application)
}

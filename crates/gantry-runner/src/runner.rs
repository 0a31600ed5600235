// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The HTTP application runner.

use std::sync::Arc;

use tracing::info;

use gantry_worker::{RelayWorker, Transport, WorkerConfig};

use crate::config::RunnerConfig;
use crate::container::Container;
use crate::environment::{Mode, WorkerEnvironment};
use crate::error::{Result, RunnerError};
use crate::handler::{ErrorHandler, active_handler};
use crate::serve::ServeLoop;
use crate::startup::{ContainerFactory, initialize};

/// Runs the application as a long-lived worker under the relay
/// supervisor.
///
/// The runner reads the supervisor-supplied mode flag once and enters
/// either the HTTP serve loop or, when enabled, the workflow worker
/// loop. Construction is non-destructive: every `with_*` method consumes
/// the runner and returns a new one.
///
/// ```ignore
/// use gantry_runner::{HttpRunner, RunnerConfig};
///
/// HttpRunner::new(RunnerConfig::from_env())
///     .with_container_factory(build_container)
///     .run()
///     .await?;
/// ```
pub struct HttpRunner {
    config: RunnerConfig,
    container_factory: Option<ContainerFactory>,
    temporary_error_handler: Option<Arc<ErrorHandler>>,
    transport: Option<Box<dyn Transport>>,
    environment: Option<WorkerEnvironment>,
    workflow_enabled: bool,
}

impl HttpRunner {
    /// Create a runner over the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            container_factory: None,
            temporary_error_handler: None,
            transport: None,
            environment: None,
            workflow_enabled: false,
        }
    }

    /// Set the container factory.
    pub fn with_container_factory<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&RunnerConfig) -> anyhow::Result<Container> + Send + 'static,
    {
        self.container_factory = Some(Box::new(factory));
        self
    }

    /// Replace the temporary error handler used while the container is
    /// being built.
    pub fn with_temporary_error_handler(mut self, handler: Arc<ErrorHandler>) -> Self {
        self.temporary_error_handler = Some(handler);
        self
    }

    /// Replace the relay transport. Without an override, HTTP mode
    /// connects to the endpoint named by the worker environment.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Replace the worker environment. Without an override, the mode
    /// flag is read from process variables at `run` time.
    pub fn with_environment(mut self, environment: WorkerEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Enable or disable workflow worker mode.
    ///
    /// Enabling is a setup-time operation: on builds without the
    /// `workflow` feature it fails here, not when the supervisor first
    /// asks for a workflow worker.
    pub fn with_workflow_enabled(mut self, enabled: bool) -> Result<Self> {
        #[cfg(not(feature = "workflow"))]
        if enabled {
            return Err(RunnerError::WorkflowSupportMissing);
        }
        self.workflow_enabled = enabled;
        Ok(self)
    }

    /// Run the worker until the supervisor stops it.
    ///
    /// Startup failures are reported to whichever error handler is
    /// registered at the time they occur and returned to the caller.
    pub async fn run(mut self) -> Result<()> {
        match self.run_inner().await {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Some(handler) = active_handler() {
                    handler.report_message(&format!("runner failed: {err}"));
                }
                Err(err)
            }
        }
    }

    async fn run_inner(&mut self) -> Result<()> {
        let container = initialize(
            &self.config,
            self.container_factory.take(),
            self.temporary_error_handler.take(),
        )?;

        let environment = self
            .environment
            .take()
            .unwrap_or_else(WorkerEnvironment::from_env);

        match environment.mode() {
            Mode::Http => self.run_http(&container).await,
            Mode::Workflow => {
                if !self.workflow_enabled {
                    return Err(RunnerError::WorkflowDisabled);
                }
                #[cfg(feature = "workflow")]
                {
                    crate::workflow::run_worker(&self.config, &container).await
                }
                #[cfg(not(feature = "workflow"))]
                {
                    Err(RunnerError::WorkflowSupportMissing)
                }
            }
            Mode::Unknown(raw) => Err(RunnerError::UnsupportedMode { mode: raw.clone() }),
        }
    }

    async fn run_http(&mut self, container: &Container) -> Result<()> {
        let transport: Box<dyn Transport> = match self.transport.take() {
            Some(transport) => transport,
            None => {
                let worker_config = WorkerConfig::from_env()?;
                Box::new(RelayWorker::connect(&worker_config).await?)
            }
        };

        info!(mode = "http", "entering serve loop");
        ServeLoop::new(
            transport,
            container.require_application()?,
            container.require_error_handler()?,
            container.state_resetter(),
            container.reclaim(),
        )
        .run()
        .await
    }
}

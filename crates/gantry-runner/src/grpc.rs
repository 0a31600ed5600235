// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The gRPC application runner.
//!
//! The gRPC wire machinery (frame parsing, call multiplexing, method
//! invocation) belongs to an external server object. This runner only
//! registers service implementations with it, supplies the per-call
//! finalizer that resets state and reclaims memory, and hands over the
//! transport.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use gantry_worker::{RelayWorker, Transport, WorkerConfig};

use crate::config::RunnerConfig;
use crate::error::{Result, RunnerError};
use crate::handler::{ErrorHandler, active_handler};
use crate::startup::{ContainerFactory, initialize};

/// Opaque gRPC service implementation. Invocation is entirely the
/// external server's business; the runner only moves instances from the
/// container to the server.
pub trait GrpcService: Send + Sync {}

/// Finalizer run by the server after every completed call.
pub type CallFinalizer = Arc<dyn Fn() + Send + Sync>;

/// External gRPC server object.
#[async_trait]
pub trait GrpcServer: Send {
    /// Register a service implementation under its interface id.
    fn register_service(&mut self, id: &str, service: Arc<dyn GrpcService>);

    /// Run the server's own blocking serve loop over the transport,
    /// invoking the finalizer after every call.
    async fn serve(
        &mut self,
        transport: Box<dyn Transport>,
        finalize: CallFinalizer,
    ) -> anyhow::Result<()>;
}

/// Runs the application as a gRPC worker under the relay supervisor.
pub struct GrpcRunner {
    config: RunnerConfig,
    container_factory: Option<ContainerFactory>,
    temporary_error_handler: Option<Arc<ErrorHandler>>,
    transport: Option<Box<dyn Transport>>,
    server: Option<Box<dyn GrpcServer>>,
    services: Vec<String>,
}

impl GrpcRunner {
    /// Create a runner over the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            container_factory: None,
            temporary_error_handler: None,
            transport: None,
            server: None,
            services: Vec::new(),
        }
    }

    /// Set the container factory.
    pub fn with_container_factory<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&RunnerConfig) -> anyhow::Result<crate::container::Container> + Send + 'static,
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

    /// Replace the relay transport. Without an override, the runner
    /// connects to the endpoint named by the worker environment.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Set the external server object to delegate to.
    pub fn with_server<S: GrpcServer + 'static>(mut self, server: S) -> Self {
        self.server = Some(Box::new(server));
        self
    }

    /// Set the interface ids to register, in order. Implementations are
    /// resolved from the container at run time.
    pub fn with_services(mut self, services: Vec<String>) -> Self {
        self.services = services;
        self
    }

    /// Registered interface ids.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Run the worker until the supervisor stops it.
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

        let mut server = self
            .server
            .take()
            .ok_or(RunnerError::ServiceNotFound("GrpcServer"))?;

        for id in &self.services {
            let service = container
                .grpc_service(id)
                .ok_or(RunnerError::ServiceNotFound("GrpcService"))?;
            info!(service = %id, "registering gRPC service");
            server.register_service(id, service);
        }

        let resetter = container.state_resetter();
        let reclaim = container.reclaim();
        let finalize: CallFinalizer = Arc::new(move || {
            resetter.reset();
            reclaim.collect();
        });

        let transport: Box<dyn Transport> = match self.transport.take() {
            Some(transport) => transport,
            None => {
                let worker_config = WorkerConfig::from_env()?;
                Box::new(RelayWorker::connect(&worker_config).await?)
            }
        };

        info!(mode = "grpc", services = self.services.len(), "delegating to gRPC server");
        server
            .serve(transport, finalize)
            .await
            .map_err(RunnerError::Application)
    }
}

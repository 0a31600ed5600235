// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Narrow container contract.
//!
//! The dependency-injection machinery itself belongs to the application
//! framework; the runner only needs a handful of well-known services, a
//! way to resolve named callables (bootstrap steps and event listeners
//! are configured by name), and the registry of resettable services. The
//! embedding application assembles a `Container` inside its factory and
//! may stash arbitrary extras for its own handlers via the typed map.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::Application;
use crate::error::{Result, RunnerError};
use crate::grpc::GrpcService;
use crate::handler::ErrorHandler;
use crate::reclaim::Reclaim;
use crate::reset::{Resettable, StateResetter};
#[cfg(feature = "workflow")]
use crate::workflow::{DeclarationProvider, WorkerFactory};

/// A named, container-resolvable callable.
pub type Callable = Arc<dyn Fn(&Container) -> anyhow::Result<()> + Send + Sync>;

/// The services a runner resolves during startup and serving.
pub struct Container {
    application: Option<Arc<dyn Application>>,
    error_handler: Option<Arc<ErrorHandler>>,
    callables: HashMap<String, Callable>,
    grpc_services: HashMap<String, Arc<dyn GrpcService>>,
    #[cfg(feature = "workflow")]
    declarations: Option<DeclarationProvider>,
    #[cfg(feature = "workflow")]
    worker_factory: Option<Arc<dyn WorkerFactory>>,
    resetter: Arc<StateResetter>,
    reclaim: Arc<Reclaim>,
    extras: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    /// Start assembling a container.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    /// The application handler chain, if registered.
    pub fn application(&self) -> Option<Arc<dyn Application>> {
        self.application.clone()
    }

    /// The application handler chain, or a startup-fatal error.
    pub fn require_application(&self) -> Result<Arc<dyn Application>> {
        self.application()
            .ok_or(RunnerError::ServiceNotFound("Application"))
    }

    /// The configured error handler, if registered.
    pub fn error_handler(&self) -> Option<Arc<ErrorHandler>> {
        self.error_handler.clone()
    }

    /// The configured error handler, or a startup-fatal error.
    pub fn require_error_handler(&self) -> Result<Arc<ErrorHandler>> {
        self.error_handler()
            .ok_or(RunnerError::ServiceNotFound("ErrorHandler"))
    }

    /// Resolve a named callable.
    pub fn callable(&self, name: &str) -> Option<Callable> {
        self.callables.get(name).cloned()
    }

    /// Resolve a gRPC service implementation by interface id.
    pub fn grpc_service(&self, id: &str) -> Option<Arc<dyn GrpcService>> {
        self.grpc_services.get(id).cloned()
    }

    /// The workflow declaration provider, if registered.
    #[cfg(feature = "workflow")]
    pub fn declarations(&self) -> Option<&DeclarationProvider> {
        self.declarations.as_ref()
    }

    /// The workflow engine worker factory, if registered.
    #[cfg(feature = "workflow")]
    pub fn worker_factory(&self) -> Option<Arc<dyn WorkerFactory>> {
        self.worker_factory.clone()
    }

    /// The per-request state resetter.
    pub fn state_resetter(&self) -> Arc<StateResetter> {
        self.resetter.clone()
    }

    /// The per-request memory reclamation point.
    pub fn reclaim(&self) -> Arc<Reclaim> {
        self.reclaim.clone()
    }

    /// Fetch an application-owned extra by type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.extras
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }
}

/// Builder for [`Container`].
#[derive(Default)]
pub struct ContainerBuilder {
    application: Option<Arc<dyn Application>>,
    error_handler: Option<Arc<ErrorHandler>>,
    callables: HashMap<String, Callable>,
    grpc_services: HashMap<String, Arc<dyn GrpcService>>,
    #[cfg(feature = "workflow")]
    declarations: Option<DeclarationProvider>,
    #[cfg(feature = "workflow")]
    worker_factory: Option<Arc<dyn WorkerFactory>>,
    resettables: Vec<Arc<dyn Resettable>>,
    reclaim: Option<Arc<Reclaim>>,
    extras: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ContainerBuilder {
    /// Register the application handler chain.
    pub fn application<A: Application + 'static>(mut self, application: Arc<A>) -> Self {
        self.application = Some(application);
        self
    }

    /// Register the configured error handler.
    pub fn error_handler(mut self, handler: Arc<ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Register a named callable.
    pub fn callable<F>(mut self, name: impl Into<String>, callable: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.callables.insert(name.into(), Arc::new(callable));
        self
    }

    /// Register a gRPC service implementation under its interface id.
    pub fn grpc_service<S: GrpcService + 'static>(
        mut self,
        id: impl Into<String>,
        service: Arc<S>,
    ) -> Self {
        self.grpc_services.insert(id.into(), service);
        self
    }

    /// Register the workflow declaration provider.
    #[cfg(feature = "workflow")]
    pub fn declarations(mut self, declarations: DeclarationProvider) -> Self {
        self.declarations = Some(declarations);
        self
    }

    /// Register the workflow engine worker factory.
    #[cfg(feature = "workflow")]
    pub fn worker_factory<F: WorkerFactory + 'static>(mut self, factory: Arc<F>) -> Self {
        self.worker_factory = Some(factory);
        self
    }

    /// Register a service whose state is reset after every request.
    pub fn resettable<R: Resettable + 'static>(mut self, service: Arc<R>) -> Self {
        self.resettables.push(service);
        self
    }

    /// Override the reclamation point (shared with the embedder, e.g.
    /// for inspection in tests).
    pub fn reclaim(mut self, reclaim: Arc<Reclaim>) -> Self {
        self.reclaim = Some(reclaim);
        self
    }

    /// Stash an application-owned extra, fetchable by type.
    pub fn service<T: Any + Send + Sync>(mut self, service: T) -> Self {
        self.extras.insert(TypeId::of::<T>(), Arc::new(service));
        self
    }

    /// Finish assembly.
    pub fn build(self) -> Container {
        Container {
            application: self.application,
            error_handler: self.error_handler,
            callables: self.callables,
            grpc_services: self.grpc_services,
            #[cfg(feature = "workflow")]
            declarations: self.declarations,
            #[cfg(feature = "workflow")]
            worker_factory: self.worker_factory,
            resetter: Arc::new(StateResetter::new(self.resettables)),
            reclaim: self.reclaim.unwrap_or_default(),
            extras: self.extras,
        }
    }
}

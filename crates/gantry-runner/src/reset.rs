// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-request state reset.
//!
//! A worker process is reused across thousands of requests, so
//! singleton-scoped services (caches, per-request flags, collectors)
//! must not leak state from one request into the next. Stateful services
//! register as [`Resettable`] and the serve loop resets the whole
//! registry once per completed iteration. There is no reliance on
//! per-request object recreation.

use std::sync::Arc;

use tracing::trace;

/// A service holding per-request mutable state.
pub trait Resettable: Send + Sync {
    /// Restore the service to its default state.
    fn reset(&self);
}

/// Registry of stateful services, reset once per request.
#[derive(Default)]
pub struct StateResetter {
    services: Vec<Arc<dyn Resettable>>,
}

impl StateResetter {
    /// Create a resetter over the given services.
    pub fn new(services: Vec<Arc<dyn Resettable>>) -> Self {
        Self { services }
    }

    /// Reset every registered service, in registration order.
    pub fn reset(&self) {
        trace!(services = self.services.len(), "resetting per-request state");
        for service in &self.services {
            service.reset();
        }
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether any services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

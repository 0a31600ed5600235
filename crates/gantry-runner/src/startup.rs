// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared startup sequence.
//!
//! Every runner variant boots the same way: install the temporary error
//! handler, build the container, swap in the container-configured
//! handler, run the bootstrap list, optionally validate event listeners.

use std::sync::Arc;

use tracing::debug;

use crate::bootstrap::{check_events, run_bootstrap};
use crate::config::RunnerConfig;
use crate::container::Container;
use crate::error::{Result, RunnerError};
use crate::groups::ConfigGroups;
use crate::handler::ErrorHandler;

/// Application-supplied container factory. The dependency graph itself
/// is the application's business; the runner only sequences its
/// construction and failure reporting.
pub type ContainerFactory = Box<dyn FnOnce(&RunnerConfig) -> anyhow::Result<Container> + Send>;

/// Register a handler as the process-wide sink, displacing the previous
/// one and applying the debug flag.
pub(crate) fn swap_handler(
    registered: &Arc<ErrorHandler>,
    unregistered: Option<&Arc<ErrorHandler>>,
    debug: bool,
) {
    if let Some(unregistered) = unregistered {
        unregistered.unregister();
    }
    if debug {
        registered.set_debug(true);
    }
    registered.register();
}

/// Run the startup sequence, returning the built container.
pub(crate) fn initialize(
    config: &RunnerConfig,
    factory: Option<ContainerFactory>,
    temporary: Option<Arc<ErrorHandler>>,
) -> Result<Container> {
    // The temporary handler covers container construction; nothing else
    // can capture failures yet.
    let temporary =
        temporary.unwrap_or_else(|| Arc::new(ErrorHandler::temporary(&config.root_path)));
    swap_handler(&temporary, None, config.debug);

    let factory = factory.ok_or_else(|| {
        RunnerError::Container(anyhow::anyhow!("no container factory configured"))
    })?;
    let container = match factory(config) {
        Ok(container) => container,
        Err(source) => {
            temporary.report(&source);
            return Err(RunnerError::Container(source));
        }
    };

    let actual = match container.require_error_handler() {
        Ok(handler) => handler,
        Err(err) => {
            temporary.report_message(&err.to_string());
            return Err(err);
        }
    };
    swap_handler(&actual, Some(&temporary), config.debug);
    debug!("container-configured error handler registered");

    let groups = ConfigGroups::new(config);
    run_bootstrap(&groups, config, &container)?;
    if config.check_events {
        check_events(&groups, config, &container)?;
    }

    Ok(container)
}

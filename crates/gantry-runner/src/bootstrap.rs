// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Startup callables and event-listener validation.

use tracing::debug;

use crate::config::RunnerConfig;
use crate::container::Container;
use crate::error::{Result, RunnerError};
use crate::groups::ConfigGroups;

/// Run the configured bootstrap callables, in listed order.
///
/// The bootstrap group file is an ordered JSON array of callable names;
/// each resolves against the container and runs with it. The first
/// failure aborts startup; there is no partial-bootstrap recovery. A
/// missing group file means nothing to bootstrap.
pub fn run_bootstrap(
    groups: &ConfigGroups,
    config: &RunnerConfig,
    container: &Container,
) -> Result<()> {
    let names: Vec<String> = groups.load_or_default(&config.bootstrap_group)?;

    for name in names {
        let callable = container
            .callable(&name)
            .ok_or_else(|| RunnerError::UnknownCallable(name.clone()))?;
        debug!(callable = %name, "running bootstrap callable");
        callable(container).map_err(|source| RunnerError::Bootstrap { name, source })?;
    }
    Ok(())
}

/// Validate the event-listener group.
///
/// The group file maps event names to listener id lists. Every listener
/// id must resolve to a container callable; a dangling declaration is a
/// startup-fatal misconfiguration rather than a silent no-op at emit
/// time.
pub fn check_events(
    groups: &ConfigGroups,
    config: &RunnerConfig,
    container: &Container,
) -> Result<()> {
    let declarations: std::collections::BTreeMap<String, Vec<String>> =
        groups.load_or_default(&config.events_group)?;

    for (event, listeners) in &declarations {
        for listener in listeners {
            if container.callable(listener).is_none() {
                return Err(RunnerError::Events(format!(
                    "listener {listener:?} for event {event:?} is not registered"
                )));
            }
        }
    }
    Ok(())
}

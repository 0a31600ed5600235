// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tracing initialization for embedding binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the default filter follows the
/// debug flag. Safe to call more than once; later calls are no-ops.
pub fn init(debug: bool) {
    let default_filter = if debug {
        "gantry_runner=debug,gantry_worker=debug"
    } else {
        "gantry_runner=info,gantry_worker=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}

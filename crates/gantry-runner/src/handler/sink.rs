// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Log sinks backing the error handler.

use std::io::Write;
use std::path::PathBuf;

use tracing::error;

/// Destination for rendered failure reports.
pub trait LogSink: Send + Sync {
    /// Record one failure line. Must not fail; sinks degrade internally.
    fn write(&self, line: &str);
}

/// Append-only file sink.
///
/// Used by the temporary error handler: before the container exists the
/// logging pipeline is not configured yet, so construction failures go
/// straight to a file under the project's runtime directory.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink appending to the given path. Parent directories are
    /// created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} {line}", chrono::Utc::now().to_rfc3339())
    }
}

impl LogSink for FileSink {
    fn write(&self, line: &str) {
        if let Err(err) = self.append(line) {
            // Last resort: the failure report must surface somewhere.
            error!(path = %self.path.display(), error = %err, report = %line, "file sink write failed");
        }
    }
}

/// Sink routing reports into the tracing pipeline.
///
/// Used by container-configured handlers once the application's logging
/// is up.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, line: &str) {
        error!("{line}");
    }
}

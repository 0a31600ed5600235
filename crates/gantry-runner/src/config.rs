// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runner configuration.
//!
//! A `RunnerConfig` is immutable once constructed: every `with_*` method
//! consumes the value and returns a new one with a single field replaced.
//! The group labels are string keys into the application's config tree
//! (see [`crate::groups`]); the runner never interprets group contents
//! beyond the shapes documented on the loaders.

use std::path::PathBuf;

/// Environment variable naming the project root.
pub const ENV_ROOT: &str = "GANTRY_ROOT";

/// Environment variable enabling debug rendering.
pub const ENV_DEBUG: &str = "GANTRY_DEBUG";

/// Environment variable naming the configuration environment overlay.
pub const ENV_ENVIRONMENT: &str = "GANTRY_ENV";

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Absolute or relative path to the project root.
    pub root_path: PathBuf,
    /// Whether debug rendering is enabled (full failure detail in
    /// error responses).
    pub debug: bool,
    /// Whether to validate the event-listener group during startup.
    pub check_events: bool,
    /// Optional environment name selecting a config overlay directory.
    pub environment: Option<String>,
    /// Config group listing the ordered bootstrap callables.
    pub bootstrap_group: String,
    /// Config group declaring event listeners.
    pub events_group: String,
    /// Config group with container definitions, passed verbatim to the
    /// container factory.
    pub di_group: String,
    /// Config group with application parameters, passed verbatim to the
    /// container factory.
    pub params_group: String,
    /// Config group with workflow declarations and engine tuning.
    pub workflow_group: String,
    /// Task queue a workflow worker binds to.
    pub task_queue: String,
}

impl RunnerConfig {
    /// Create a configuration rooted at the given path, with default
    /// group labels.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            debug: false,
            check_events: false,
            environment: None,
            bootstrap_group: "bootstrap-web".to_string(),
            events_group: "events-web".to_string(),
            di_group: "di-web".to_string(),
            params_group: "params-web".to_string(),
            workflow_group: "workflow".to_string(),
            task_queue: "default".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Optional Environment Variables
    /// - `GANTRY_ROOT` - Project root (default: ".")
    /// - `GANTRY_DEBUG` - Debug rendering ("1"/"true", default: off)
    /// - `GANTRY_ENV` - Environment overlay name (default: none)
    pub fn from_env() -> Self {
        let root = std::env::var(ENV_ROOT).unwrap_or_else(|_| ".".to_string());
        let debug = std::env::var(ENV_DEBUG)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let environment = std::env::var(ENV_ENVIRONMENT).ok().filter(|v| !v.is_empty());

        let mut config = Self::new(root).with_debug(debug);
        config.environment = environment;
        config
    }

    /// Set the debug flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set whether the event-listener group is validated at startup.
    pub fn with_check_events(mut self, check_events: bool) -> Self {
        self.check_events = check_events;
        self
    }

    /// Set the environment overlay name.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the bootstrap group label.
    pub fn with_bootstrap_group(mut self, group: impl Into<String>) -> Self {
        self.bootstrap_group = group.into();
        self
    }

    /// Set the events group label.
    pub fn with_events_group(mut self, group: impl Into<String>) -> Self {
        self.events_group = group.into();
        self
    }

    /// Set the container definitions group label.
    pub fn with_di_group(mut self, group: impl Into<String>) -> Self {
        self.di_group = group.into();
        self
    }

    /// Set the parameters group label.
    pub fn with_params_group(mut self, group: impl Into<String>) -> Self {
        self.params_group = group.into();
        self
    }

    /// Set the workflow group label.
    pub fn with_workflow_group(mut self, group: impl Into<String>) -> Self {
        self.workflow_group = group.into();
        self
    }

    /// Set the workflow task queue.
    pub fn with_task_queue(mut self, task_queue: impl Into<String>) -> Self {
        self.task_queue = task_queue.into();
        self
    }

    /// Directory holding the config group files.
    pub fn config_dir(&self) -> PathBuf {
        self.root_path.join("config")
    }

    /// Directory for runtime artifacts (fallback logs).
    pub fn runtime_dir(&self) -> PathBuf {
        self.root_path.join("runtime")
    }
}

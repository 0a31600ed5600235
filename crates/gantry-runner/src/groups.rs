// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Config group loading.
//!
//! Group files live at `<root>/config/<group>.json`. When an environment
//! name is configured, `<root>/config/<environment>/<group>.json` wins
//! over the base file. Merging across sources is the config tooling's
//! business; the runner only reads already-merged group documents.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::RunnerConfig;

/// Errors from config group loading.
#[derive(Debug, Error)]
pub enum GroupError {
    /// The group file does not exist in the base or overlay directory.
    #[error("config group {0:?} not found")]
    Missing(String),

    /// The group file could not be read.
    #[error("config group {group:?} unreadable: {source}")]
    Io {
        group: String,
        #[source]
        source: std::io::Error,
    },

    /// The group file is not valid JSON or has the wrong shape.
    #[error("config group {group:?} malformed: {source}")]
    Parse {
        group: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reader for named config groups.
#[derive(Debug, Clone)]
pub struct ConfigGroups {
    config_dir: PathBuf,
    environment: Option<String>,
}

impl ConfigGroups {
    /// Create a reader for the given runner configuration.
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            config_dir: config.config_dir(),
            environment: config.environment.clone(),
        }
    }

    /// Path the group would be loaded from, preferring the overlay.
    fn resolve(&self, group: &str) -> Option<PathBuf> {
        if let Some(env) = &self.environment {
            let overlay = self.config_dir.join(env).join(format!("{group}.json"));
            if overlay.is_file() {
                return Some(overlay);
            }
        }
        let base = self.config_dir.join(format!("{group}.json"));
        base.is_file().then_some(base)
    }

    /// Whether the group exists.
    pub fn contains(&self, group: &str) -> bool {
        self.resolve(group).is_some()
    }

    /// Load a group as a raw JSON value.
    pub fn load(&self, group: &str) -> Result<serde_json::Value, GroupError> {
        self.load_as(group)
    }

    /// Load a group into a deserializable shape.
    pub fn load_as<T: DeserializeOwned>(&self, group: &str) -> Result<T, GroupError> {
        let path = self
            .resolve(group)
            .ok_or_else(|| GroupError::Missing(group.to_string()))?;
        let raw = std::fs::read_to_string(&path).map_err(|source| GroupError::Io {
            group: group.to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| GroupError::Parse {
            group: group.to_string(),
            source,
        })
    }

    /// Load a group, or its default value when the file is absent.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        group: &str,
    ) -> Result<T, GroupError> {
        match self.load_as(group) {
            Ok(value) => Ok(value),
            Err(GroupError::Missing(_)) => Ok(T::default()),
            Err(err) => Err(err),
        }
    }
}

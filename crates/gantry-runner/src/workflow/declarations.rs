// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow and activity type declarations.

use serde::{Deserialize, Serialize};

/// The workflow and activity types a worker registers with the engine.
///
/// Order is preserved: types are registered exactly as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationProvider {
    #[serde(default)]
    workflows: Vec<String>,
    #[serde(default)]
    activities: Vec<String>,
}

impl DeclarationProvider {
    /// Create a provider over explicit type-name lists.
    pub fn new(workflows: Vec<String>, activities: Vec<String>) -> Self {
        Self {
            workflows,
            activities,
        }
    }

    /// Declared workflow type names, in registration order.
    pub fn workflows(&self) -> &[String] {
        &self.workflows
    }

    /// Declared activity type names, in registration order.
    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    /// Whether anything is declared at all.
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty() && self.activities.is_empty()
    }
}

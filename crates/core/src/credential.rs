// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient, in-memory-only credential material fetched on demand through
//! the API client. Never persisted by the worker.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::id::CredentialId;

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    pub id: CredentialId,
    pub category: String,
    pub name: String,
    pub value: HashMap<String, serde_json::Value>,
    pub is_active: bool,
}

impl std::fmt::Debug for Credential {
    /// Never print credential values, even in test failure output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;

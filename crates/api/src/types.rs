// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response payload shapes carried in the envelope's `data` field.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppendLogResult {
    pub size: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LockAcquireResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LockStatusResult {
    #[serde(default)]
    pub status: String,
}

impl LockStatusResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LockCheckResult {
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub value_matched: bool,
}

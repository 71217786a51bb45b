// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wn_core::Severity;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed task event: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl wn_core::ClassifiedError for WireError {
    fn severity(&self) -> Severity {
        Severity::Warn
    }
}

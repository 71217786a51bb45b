// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wn_core::Severity;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The envelope's `code` was non-zero.
    #[error("remote error ({code}): {message}")]
    Remote { code: i64, message: String },
    /// The credential exists but is disabled.
    #[error("credential {0} is disabled")]
    CredentialDisabled(String),
}

impl wn_core::ClassifiedError for ApiError {
    fn severity(&self) -> Severity {
        match self {
            ApiError::Transport(_) => Severity::Warn,
            ApiError::Decode(_) | ApiError::Remote { .. } | ApiError::CredentialDisabled(_) => {
                Severity::Error
            }
        }
    }
}

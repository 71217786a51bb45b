// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wn_core::Severity;

/// Raised by [`crate::config::Config::load`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for environment variable {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

impl wn_core::ClassifiedError for ConfigError {
    fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

/// Raised by the event transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {0}")]
    Connect(String),
    #[error(transparent)]
    Wire(#[from] wn_wire::WireError),
    #[error("worker registration failed: {0}")]
    RegistrationFailed(String),
    #[error(transparent)]
    Api(#[from] wn_api::ApiError),
    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("no data received within {0:?}")]
    ReadTimeout(std::time::Duration),
    #[error("write did not complete within {0:?}")]
    WriteTimeout(std::time::Duration),
}

impl wn_core::ClassifiedError for TransportError {
    fn severity(&self) -> Severity {
        match self {
            TransportError::Connect(_) | TransportError::Socket(_) => Severity::Warn,
            TransportError::RegistrationFailed(_) => Severity::Error,
            TransportError::Wire(_) => Severity::Warn,
            TransportError::Api(_) => Severity::Warn,
            TransportError::ReadTimeout(_) | TransportError::WriteTimeout(_) => Severity::Warn,
        }
    }
}

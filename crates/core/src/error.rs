// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared error taxonomy: every subsystem keeps its own `thiserror`
//! enum, but each implements [`Severity`] classification so the central
//! error handler (the dispatcher and the process entrypoint) can decide
//! how loudly to log and whether a status update is owed to the API
//! server.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Logged only, no status update.
    Info,
    /// Transient: a failed heartbeat, a dropped connection, a refresh
    /// failure. Recovery is automatic.
    Warn,
    /// A single task failed, or another non-fatal error occurred.
    /// Propagated to the API server as a status update.
    Error,
    /// Infrastructure issue serious enough to abort startup or the process.
    Fatal,
}

/// Implemented by every subsystem's error enum so error handling can be
/// dispatched generically instead of matching on concrete types everywhere.
pub trait ClassifiedError: std::error::Error {
    fn severity(&self) -> Severity;
}

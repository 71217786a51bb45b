// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four-phase graceful shutdown drain: stop accepting new tasks, poll
//! the running table until it empties (or a deadline passes), close the
//! transport, then run registered hooks.

use std::time::Duration;

use tracing::{info, warn};

use wn_core::Clock;

use crate::error::DispatchError;
use crate::running_table::RunningTable;

/// Polling interval against the running table.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Callback invoked in registration order during phase 4; failures are
/// logged but never abort the remaining hooks.
pub type ShutdownHook = Box<dyn Fn() + Send + Sync>;

pub struct ShutdownCoordinator<C: Clock> {
    running: std::sync::Arc<RunningTable>,
    clock: C,
    hooks: Vec<ShutdownHook>,
}

impl<C: Clock> ShutdownCoordinator<C> {
    pub fn new(running: std::sync::Arc<RunningTable>, clock: C) -> Self {
        Self { running, clock, hooks: Vec::new() }
    }

    /// Registered hooks run in this order during the final phase; wiring
    /// happens once at construction.
    pub fn register_hook(&mut self, hook: ShutdownHook) {
        self.hooks.push(hook);
    }

    /// Poll, close, then run hooks. Stopping acceptance of new tasks is a
    /// logical marker left to the caller — the transport keeps running so
    /// in-flight updates still flow out.
    pub async fn drain(&self, deadline: Duration, close_transport: impl FnOnce()) -> Result<(), DispatchError> {
        let start = self.clock.now();
        let result = loop {
            let remaining = self.running.len();
            if remaining == 0 {
                info!("in-flight tasks drained");
                break Ok(());
            }
            if self.clock.now().duration_since(start) >= deadline {
                warn!(remaining, "drain deadline exceeded, closing transport anyway");
                break Err(DispatchError::DrainTimeout(remaining));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        };

        close_transport();
        for hook in &self.hooks {
            hook();
        }
        result
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner framework and its built-in implementations: a uniform
//! `Runner` contract, a process-global registry of category factories, the
//! shared `BaseRunner` state/work-dir/log-channel helpers, and the
//! concrete runners dispatched to by task category.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod base;
mod contract;
mod error;
mod exec;
mod log_sink;
mod registry;
pub mod runners;

pub use base::BaseRunner;
pub use contract::Runner;
pub use error::RunnerError;
pub use log_sink::{log_channel, send_log_end, send_log_line, LogSink, LogSource, DEFAULT_LOG_BUFFER};
pub use registry::{Factory, RunnerRegistry};
pub use runners::register_default_runners;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Node daemon (wnd)
//!
//! Long-running process that registers with the API server, maintains the
//! event transport, and dispatches incoming task events to runners.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod error;
mod transport;

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

use wn_api::{ApiAdapter, HttpApiClient};
use wn_core::SystemClock;
use wn_dispatch::{Dispatcher, ShutdownCoordinator, TaskUpdateSink};
use wn_runner::{register_default_runners, RunnerRegistry};

use crate::config::Config;
use crate::transport::EventTransport;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("wnd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("wnd {}", env!("CARGO_PKG_VERSION"));
                println!("Worker Node daemon - registers with the API server and runs tasks");
                println!();
                println!("USAGE:");
                println!("    wnd");
                println!();
                println!("Configuration is read entirely from the environment; see README for the variable list.");
                return Ok(());
            }
            _ => {}
        }
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    rotate_log_if_needed(&config.log_path);
    let _log_guard = setup_logging(&config)?;

    info!(worker_id = %config.worker_id, "worker node starting");

    let api = Arc::new(HttpApiClient::new(config.api_url.clone(), config.api_key.clone())?);
    let registry = Arc::new(RunnerRegistry::new());
    register_default_runners(&registry);

    let worker = wn_core::WorkerIdentity {
        id: config.worker_id,
        name: config.worker_name.clone(),
        metadata: wn_core::WorkerMetadata {
            tasks: config.worker_categories.clone(),
        },
    };

    let mut categories = Vec::new();
    for code in &config.worker_categories {
        match api.get_category(code).await {
            Ok(category) => categories.push(category),
            Err(err) => warn!(%err, category = %code, "failed to fetch category, host-prep skipped for it"),
        }
    }

    let (task_tx, mut task_rx) = tokio::sync::mpsc::channel(64);
    let config = Arc::new(config);
    let transport = EventTransport::spawn(
        Arc::clone(&config),
        worker.clone(),
        categories.clone(),
        task_tx,
    );

    let dispatcher = Dispatcher::new(
        Arc::clone(&api),
        Arc::clone(&registry),
        worker,
        Arc::new(transport.clone()) as Arc<dyn TaskUpdateSink>,
        SystemClock,
    );

    let shutdown = ShutdownCoordinator::new(dispatcher.running_table(), SystemClock);
    let worker_id = config.worker_id.to_string();

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut ping_tick = tokio::time::interval(config.ping_interval);

    println!("READY");
    info!("entering main event loop");

    loop {
        tokio::select! {
            Some(event) = task_rx.recv() => {
                dispatcher.handle_event(event).await;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, draining");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, draining");
                break;
            }
            _ = ping_tick.tick() => {
                if let Err(err) = api.ping_worker(&worker_id).await {
                    warn!(%err, "heartbeat ping failed");
                }
            }
        }
    }

    let drain_result = shutdown
        .drain(config.drain_timeout, || {
            info!("closing event transport");
        })
        .await;
    transport::run_teardown(&categories).await;

    if let Err(err) = drain_result {
        error!(%err, "shutdown drain did not complete cleanly");
        std::process::exit(1);
    }

    info!("worker node exiting cleanly");
    Ok(())
}

/// Shifts `wnd.log` → `wnd.log.1` → `wnd.log.2` → `wnd.log.3`, deleting the
/// oldest. Best-effort: rotation failures are silently ignored so the
/// daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let dir = config.log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
    let file_name = config.log_path.file_name().ok_or("log path has no file name")?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

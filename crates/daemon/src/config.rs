// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration, loaded once from the environment.

use std::time::Duration;

use wn_core::WorkerId;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub worker_id: WorkerId,
    pub worker_name: String,
    pub worker_categories: Vec<String>,

    pub ping_interval: Duration,
    pub reconnect_delay: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub chunk_threshold: usize,
    pub chunk_size: usize,

    pub drain_timeout: Duration,

    pub log_path: std::path::PathBuf,
}

impl Config {
    /// `API_URL`, `API_KEY`, `WORKER_ID`, and `WORKER_NAME` are required;
    /// everything else falls back to the documented default.
    pub fn load() -> Result<Self, ConfigError> {
        let api_url = required_var("API_URL")?;
        let api_key = required_var("API_KEY")?;
        let worker_id = required_var("WORKER_ID")?
            .parse::<WorkerId>()
            .map_err(|_| ConfigError::InvalidVar {
                name: "WORKER_ID",
                value: std::env::var("WORKER_ID").unwrap_or_default(),
            })?;
        let worker_name = required_var("WORKER_NAME")?;
        let worker_categories = std::env::var("WORKER_CATEGORIES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            api_url,
            api_key,
            worker_id,
            worker_name,
            worker_categories,
            ping_interval: duration_secs_var("PING_INTERVAL_SECS", 20)?,
            reconnect_delay: duration_secs_var("RECONNECT_DELAY_SECS", 5)?,
            read_timeout: duration_secs_var("READ_TIMEOUT_SECS", 90)?,
            write_timeout: duration_secs_var("WRITE_TIMEOUT_SECS", 30)?,
            chunk_threshold: usize_var("CHUNK_THRESHOLD_BYTES", wn_wire::CHUNK_THRESHOLD)?,
            chunk_size: usize_var("CHUNK_SIZE_BYTES", wn_wire::CHUNK_SIZE)?,
            drain_timeout: duration_secs_var("DRAIN_TIMEOUT_SECS", 30)?,
            log_path: std::env::var("WORKER_LOG_PATH")
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|_| std::path::PathBuf::from("worker-node.log")),
        })
    }

    /// `{base}/ws/task/`, scheme swapped `http`/`https` → `ws`/`wss`.
    pub fn ws_url(&self) -> String {
        let swapped = if let Some(rest) = self.api_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.api_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.api_url.clone()
        };
        format!("{}/ws/task/", swapped.trim_end_matches('/'))
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn duration_secs_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Err(_) => Ok(Duration::from_secs(default)),
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
    }
}

fn usize_var(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

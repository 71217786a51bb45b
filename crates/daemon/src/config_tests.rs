// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

fn clear_env() {
    for var in [
        "API_URL",
        "API_KEY",
        "WORKER_ID",
        "WORKER_NAME",
        "WORKER_CATEGORIES",
        "PING_INTERVAL_SECS",
        "RECONNECT_DELAY_SECS",
        "READ_TIMEOUT_SECS",
        "WRITE_TIMEOUT_SECS",
        "CHUNK_THRESHOLD_BYTES",
        "CHUNK_SIZE_BYTES",
        "DRAIN_TIMEOUT_SECS",
        "WORKER_LOG_PATH",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn missing_required_var_is_fatal() {
    clear_env();
    let err = Config::load().expect_err("API_URL is unset");
    assert!(matches!(err, ConfigError::MissingVar("API_URL")));
}

#[test]
#[serial]
fn loads_required_vars_and_falls_back_on_the_rest() {
    clear_env();
    std::env::set_var("API_URL", "https://api.example.com");
    std::env::set_var("API_KEY", "secret");
    let worker_id = wn_core::WorkerId::new();
    std::env::set_var("WORKER_ID", worker_id.to_string());
    std::env::set_var("WORKER_NAME", "worker-1");

    let config = Config::load().expect("all required vars present");

    assert_eq!(config.api_url, "https://api.example.com");
    assert_eq!(config.worker_id, worker_id);
    assert_eq!(config.worker_name, "worker-1");
    assert!(config.worker_categories.is_empty());
    assert_eq!(config.ping_interval, Duration::from_secs(20));
    assert_eq!(config.reconnect_delay, Duration::from_secs(5));
    assert_eq!(config.ws_url(), "wss://api.example.com/ws/task/");

    clear_env();
}

#[test]
#[serial]
fn invalid_numeric_override_is_reported_with_its_name() {
    clear_env();
    std::env::set_var("API_URL", "http://api.example.com");
    std::env::set_var("API_KEY", "secret");
    std::env::set_var("WORKER_ID", wn_core::WorkerId::new().to_string());
    std::env::set_var("WORKER_NAME", "worker-1");
    std::env::set_var("PING_INTERVAL_SECS", "not-a-number");

    let err = Config::load().expect_err("PING_INTERVAL_SECS is invalid");
    assert!(matches!(
        err,
        ConfigError::InvalidVar {
            name: "PING_INTERVAL_SECS",
            ..
        }
    ));

    clear_env();
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = HttpApiClient::new("http://localhost:8080/", "key").expect("build client");
    assert_eq!(client.url("/task/1/"), "http://localhost:8080/task/1/");
}

#[test]
fn new_accepts_a_bare_base_url() {
    let client = HttpApiClient::new("http://localhost:8080", "key").expect("build client");
    assert_eq!(client.url("/task/1/"), "http://localhost:8080/task/1/");
}

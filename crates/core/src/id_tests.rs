// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_ids_are_unique() {
    assert_ne!(TaskId::new(), TaskId::new());
}

#[test]
fn display_round_trips_through_from_str() {
    let id = WorkerId::new();
    let parsed: WorkerId = id.to_string().parse().expect("valid uuid");
    assert_eq!(id, parsed);
}

#[test]
fn from_str_rejects_garbage() {
    assert!("not-a-uuid".parse::<TaskId>().is_err());
}

#[test]
fn serde_round_trip_is_transparent() {
    let id = CredentialId::new();
    let json = serde_json::to_string(&id).expect("serialize");
    assert_eq!(json, format!("\"{}\"", id.0));
    let back: CredentialId = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(id, back);
}

#[test]
fn default_generates_a_fresh_id() {
    assert_ne!(TaskId::default(), TaskId::default());
}

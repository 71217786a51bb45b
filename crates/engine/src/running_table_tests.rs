// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use wn_core::TaskId;

use super::test_support::noop_runner;
use super::*;

#[test]
fn insert_then_get_returns_the_same_handle() {
    let table = RunningTable::new();
    let id = TaskId::new();
    table.insert(id, Arc::new(noop_runner()));
    assert!(table.get(&id).is_some());
    assert_eq!(table.len(), 1);
}

#[test]
fn remove_drops_the_entry() {
    let table = RunningTable::new();
    let id = TaskId::new();
    table.insert(id, Arc::new(noop_runner()));
    table.remove(&id);
    assert!(table.get(&id).is_none());
    assert!(table.is_empty());
}

#[test]
fn unknown_id_returns_none() {
    let table = RunningTable::new();
    assert!(table.get(&TaskId::new()).is_none());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn descriptor_with_select(select: Vec<&str>) -> TaskDescriptor {
    TaskDescriptor {
        id: TaskId::new(),
        category: "command".into(),
        name: "test".into(),
        command: "echo".into(),
        args: "hi".into(),
        timeout: 5,
        metadata: TaskMetadata {
            worker_select: select.into_iter().map(String::from).collect(),
            ..Default::default()
        },
        retry_count: 0,
        max_retry: 0,
        save_log: false,
        status: TaskStatus::Pending,
    }
}

#[test]
fn empty_worker_select_passes_any_worker() {
    let task = descriptor_with_select(vec![]);
    assert!(task.passes_worker_select("w-1", "worker-one"));
}

#[test]
fn worker_select_matches_id_or_name() {
    let task = descriptor_with_select(vec!["other-worker", "w-1"]);
    assert!(task.passes_worker_select("w-1", "worker-one"));

    let task = descriptor_with_select(vec!["worker-one"]);
    assert!(task.passes_worker_select("w-1", "worker-one"));
}

#[test]
fn worker_select_rejects_unmatched_worker() {
    let task = descriptor_with_select(vec!["some-other-worker"]);
    assert!(!task.passes_worker_select("w-1", "worker-one"));
}

#[test]
fn status_round_trips_pending() {
    let json = serde_json::to_string(&TaskStatus::Pending).expect("serialize");
    assert_eq!(json, "\"pending\"");
    let back: TaskStatus = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, TaskStatus::Pending);
}

#[test]
fn status_preserves_unknown_values() {
    let back: TaskStatus = serde_json::from_str("\"success\"").expect("deserialize");
    assert_eq!(back, TaskStatus::Other("success".into()));
}

#[test]
fn task_event_deserializes_minimal_run() {
    let raw = r#"{"action":"run","tasks":[]}"#;
    let event: TaskEvent = serde_json::from_str(raw).expect("deserialize");
    assert_eq!(event.action, TaskAction::Run);
    assert!(event.tasks.is_empty());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn worker(tasks: Vec<&str>) -> WorkerIdentity {
    WorkerIdentity {
        id: WorkerId::new(),
        name: "worker-one".into(),
        metadata: WorkerMetadata {
            tasks: tasks.into_iter().map(String::from).collect(),
        },
    }
}

#[test]
fn supports_category_is_case_and_space_insensitive() {
    let w = worker(vec!["Command", " script "]);
    assert!(w.supports_category("command"));
    assert!(w.supports_category("SCRIPT"));
    assert!(!w.supports_category("http"));
}

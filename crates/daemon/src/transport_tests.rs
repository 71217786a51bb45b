// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wn_core::Category;

use super::*;

#[tokio::test]
async fn host_prep_skips_setup_when_check_already_passes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let marker = tmp.path().join("setup-ran");
    let category = Category {
        code: "command".into(),
        check: Some("true".into()),
        setup: Some(format!("touch {}", marker.display())),
        teardown: None,
    };

    run_host_prep(&[category]).await;

    assert!(!marker.exists());
}

#[tokio::test]
async fn host_prep_runs_setup_then_rechecks_when_check_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let marker = tmp.path().join("setup-ran");
    let category = Category {
        code: "command".into(),
        check: Some(format!("test -f {}", marker.display())),
        setup: Some(format!("touch {}", marker.display())),
        teardown: None,
    };

    run_host_prep(&[category]).await;

    assert!(marker.exists());
}

#[tokio::test]
async fn host_prep_with_no_check_configured_counts_as_success() {
    let category = Category {
        code: "command".into(),
        check: None,
        setup: Some("false".into()),
        teardown: None,
    };

    run_host_prep(&[category]).await;
}

#[tokio::test]
async fn teardown_runs_every_configured_snippet() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let marker = tmp.path().join("teardown-ran");
    let category = Category {
        code: "command".into(),
        check: None,
        setup: None,
        teardown: Some(format!("touch {}", marker.display())),
    };

    run_teardown(&[category]).await;

    assert!(marker.exists());
}

#[tokio::test]
async fn teardown_without_a_snippet_is_a_no_op() {
    let category = Category {
        code: "command".into(),
        check: None,
        setup: None,
        teardown: None,
    };

    run_teardown(&[category]).await;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn debug_output_redacts_value() {
    let mut value = HashMap::new();
    value.insert("password".to_string(), serde_json::json!("super-secret"));
    let cred = Credential {
        id: CredentialId::new(),
        category: "database".into(),
        name: "prod-db".into(),
        value,
        is_active: true,
    };
    let debug = format!("{cred:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("<redacted>"));
}

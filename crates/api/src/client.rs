// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous-per-call JSON-over-HTTP client: bearer-token authorization,
//! a 30-second operation timeout, and the shared `{code, message, data}`
//! envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use wn_core::{Category, Credential, TaskDescriptor};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::types::{AppendLogResult, LockAcquireResult, LockCheckResult, LockStatusResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The set of API server operations the rest of the worker depends on.
/// Implemented by [`HttpApiClient`] for real use and by a fake behind
/// `test-support` for everything else.
#[async_trait]
pub trait ApiAdapter: Send + Sync + 'static {
    async fn get_category(&self, code: &str) -> Result<Category, ApiError>;
    async fn get_task(&self, id: &str) -> Result<TaskDescriptor, ApiError>;
    async fn append_task_log(&self, id: &str, chunk: &str) -> Result<AppendLogResult, ApiError>;
    async fn acquire_lock(&self, key: &str, ttl_secs: u64) -> Result<LockAcquireResult, ApiError>;
    async fn release_lock(&self, key: &str, value: &str) -> Result<LockStatusResult, ApiError>;
    async fn refresh_lock(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<LockStatusResult, ApiError>;
    async fn check_lock(&self, key: &str, value: &str) -> Result<LockCheckResult, ApiError>;
    async fn ping_worker(&self, id: &str) -> Result<(), ApiError>;
    async fn get_credential(&self, id: &str) -> Result<Credential, ApiError>;
    async fn create_approval(&self, data: Value) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        let envelope: Envelope<T> = resp.json().await?;
        envelope.into_data()
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<T> = resp.json().await?;
        envelope.into_data()
    }

    async fn put_ack(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let envelope: Envelope<Value> = resp.json().await?;
        envelope.into_ack()
    }
}

#[async_trait]
impl ApiAdapter for HttpApiClient {
    async fn get_category(&self, code: &str) -> Result<Category, ApiError> {
        self.get(&format!("/category/{code}/"), &[]).await
    }

    async fn get_task(&self, id: &str) -> Result<TaskDescriptor, ApiError> {
        self.get(&format!("/task/{id}/"), &[]).await
    }

    async fn append_task_log(&self, id: &str, chunk: &str) -> Result<AppendLogResult, ApiError> {
        self.post(
            &format!("/tasklog/{id}/append/"),
            &serde_json::json!({ "content": chunk }),
        )
        .await
    }

    async fn acquire_lock(&self, key: &str, ttl_secs: u64) -> Result<LockAcquireResult, ApiError> {
        self.get(
            "/lock/acquire",
            &[("key", key.to_string()), ("expire", ttl_secs.to_string())],
        )
        .await
    }

    async fn release_lock(&self, key: &str, value: &str) -> Result<LockStatusResult, ApiError> {
        self.get(
            "/lock/release",
            &[("key", key.to_string()), ("value", value.to_string())],
        )
        .await
    }

    async fn refresh_lock(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<LockStatusResult, ApiError> {
        self.get(
            "/lock/refresh",
            &[
                ("key", key.to_string()),
                ("value", value.to_string()),
                ("expire", ttl_secs.to_string()),
            ],
        )
        .await
    }

    async fn check_lock(&self, key: &str, value: &str) -> Result<LockCheckResult, ApiError> {
        self.get(
            "/lock/check",
            &[("key", key.to_string()), ("value", value.to_string())],
        )
        .await
    }

    async fn ping_worker(&self, id: &str) -> Result<(), ApiError> {
        self.put_ack(&format!("/worker/{id}/ping/")).await
    }

    async fn get_credential(&self, id: &str) -> Result<Credential, ApiError> {
        let cred: Credential = self
            .post(&format!("/credentials/{id}/decrypt/"), &Value::Null)
            .await?;
        if !cred.is_active {
            return Err(ApiError::CredentialDisabled(id.to_string()));
        }
        Ok(cred)
    }

    async fn create_approval(&self, data: Value) -> Result<Value, ApiError> {
        self.post("/approval/", &data).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

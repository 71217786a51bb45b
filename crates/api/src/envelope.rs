// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `{code, message, data}` response envelope every API endpoint shares.
//! `code == 0` is success; anything else surfaces as [`crate::ApiError::Remote`].

use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        if self.code != 0 {
            return Err(ApiError::Remote {
                code: self.code,
                message: self.message,
            });
        }
        self.data.ok_or_else(|| ApiError::Remote {
            code: self.code,
            message: "response carried no data".to_string(),
        })
    }

    /// Like [`Self::into_data`] but tolerates a missing `data` field —
    /// for endpoints (ping, acknowledgements) whose success is carried
    /// entirely by `code`.
    pub fn into_ack(self) -> Result<(), ApiError> {
        if self.code != 0 {
            return Err(ApiError::Remote {
                code: self.code,
                message: self.message,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_yields_data() {
        let env: Envelope<i64> = serde_json::from_str(r#"{"code":0,"message":"ok","data":42}"#)
            .expect("deserialize");
        assert_eq!(env.into_data().expect("ok"), 42);
    }

    #[test]
    fn error_envelope_surfaces_remote_error() {
        let env: Envelope<i64> =
            serde_json::from_str(r#"{"code":1,"message":"boom"}"#).expect("deserialize");
        let err = env.into_data().expect_err("should be remote error");
        assert!(matches!(err, ApiError::Remote { code: 1, .. }));
    }
}

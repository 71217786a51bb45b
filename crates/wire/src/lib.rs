// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wn-wire: the event-transport wire protocol — inbound task events
//! (re-exported from `wn-core`), outbound client events, sentinel framing,
//! and decode errors.

pub mod client_event;
pub mod error;
pub mod frame;

pub use client_event::{ClientAction, ClientEvent};
pub use error::WireError;
pub use frame::{build_frames, build_frames_default, FrameMode, FrameReader, CHUNK_SIZE, CHUNK_THRESHOLD, SENTINEL};
pub use wn_core::{TaskAction, TaskDescriptor, TaskEvent};

/// Decode a raw reassembled payload into an inbound task event.
pub fn decode_task_event(payload: &[u8]) -> Result<TaskEvent, WireError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Encode an outbound client event to its wire bytes (before framing).
pub fn encode_client_event(event: &ClientEvent) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(event)?)
}

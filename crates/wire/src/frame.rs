// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sentinel framing over the duplex transport.
//!
//! Messages are delimited by a fixed 17-byte non-printable separator. A
//! single incoming frame may be split across multiple receive events, and
//! multiple frames may arrive concatenated; [`FrameReader`] keeps a rolling
//! buffer and emits complete payloads as soon as a sentinel pair closes.
//!
//! Outbound framing is the mirror image: [`build_frames`] wraps a payload in
//! leading/trailing sentinels and, above a size threshold, splits it into
//! several writer-mutex-serialized chunks without ever placing a sentinel
//! inside the payload.

/// 17 non-printable bytes, chosen to be vanishingly unlikely inside a JSON
/// payload.
pub const SENTINEL: [u8; 17] = [
    0x00, 0x17, 0xA5, 0x5A, 0xC3, 0x3C, 0x91, 0x19, 0xE7, 0x7E, 0x2D, 0xD2, 0x84, 0x48, 0xB6, 0x6B,
    0x00,
];

/// Default chunking threshold: payloads at or under this size are sent as a
/// single frame.
pub const CHUNK_THRESHOLD: usize = 1024;

/// Default chunk size for payloads above the threshold.
pub const CHUNK_SIZE: usize = 512;

/// Build the sequence of byte buffers to write, in order, for one logical
/// outbound message. Below (and at) `chunk_threshold` this is a single
/// element: `SENTINEL ++ payload ++ SENTINEL`. Above it, the payload is
/// split into `chunk_size`-sized pieces; the leading sentinel prefixes the
/// first piece and the trailing sentinel suffixes the last, with no
/// sentinel appearing between pieces.
pub fn build_frames(payload: &[u8], chunk_threshold: usize, chunk_size: usize) -> Vec<Vec<u8>> {
    if payload.len() <= chunk_threshold {
        let mut frame = Vec::with_capacity(payload.len() + SENTINEL.len() * 2);
        frame.extend_from_slice(&SENTINEL);
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&SENTINEL);
        return vec![frame];
    }

    let mut chunks: Vec<Vec<u8>> = payload.chunks(chunk_size.max(1)).map(|c| c.to_vec()).collect();
    if let Some(first) = chunks.first_mut() {
        let mut with_lead = Vec::with_capacity(SENTINEL.len() + first.len());
        with_lead.extend_from_slice(&SENTINEL);
        with_lead.extend_from_slice(first);
        *first = with_lead;
    }
    if let Some(last) = chunks.last_mut() {
        last.extend_from_slice(&SENTINEL);
    }
    chunks
}

/// Convenience wrapper over [`build_frames`] using the default thresholds.
pub fn build_frames_default(payload: &[u8]) -> Vec<Vec<u8>> {
    build_frames(payload, CHUNK_THRESHOLD, CHUNK_SIZE)
}

/// How the reader recognizes frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Look for sentinel pairs (the normal mode).
    Sentinel,
    /// No sentinel is configured; fall back to incremental JSON-completeness
    /// checks on the rolling buffer.
    JsonCompleteness,
}

/// Reassembles complete payloads from a byte stream that may split or
/// concatenate frames arbitrarily.
pub struct FrameReader {
    mode: FrameMode,
    buf: Vec<u8>,
}

impl FrameReader {
    pub fn new(mode: FrameMode) -> Self {
        Self {
            mode,
            buf: Vec::new(),
        }
    }

    /// Feed newly received bytes in; returns zero or more complete payloads
    /// (sentinel contents stripped) found since the last call, in order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(data);
        match self.mode {
            FrameMode::Sentinel => self.drain_sentinel_frames(),
            FrameMode::JsonCompleteness => self.drain_json_frames(),
        }
    }

    fn drain_sentinel_frames(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let Some(start) = find(&self.buf, &SENTINEL, 0) else {
                break;
            };
            let after_start = start + SENTINEL.len();
            let Some(end) = find(&self.buf, &SENTINEL, after_start) else {
                break;
            };
            out.push(self.buf[after_start..end].to_vec());
            self.buf.drain(..end + SENTINEL.len());
        }
        out
    }

    fn drain_json_frames(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let mut stream =
                serde_json::Deserializer::from_slice(&self.buf).into_iter::<serde_json::Value>();
            match stream.next() {
                Some(Ok(value)) => {
                    let consumed = stream.byte_offset();
                    out.push(serde_json::to_vec(&value).unwrap_or_default());
                    self.buf.drain(..consumed);
                }
                _ => break,
            }
        }
        out
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;

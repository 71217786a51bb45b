// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The non-blocking log channel every runner writes to, shared by the Base
//! runner helpers. A full sink drops
//! the line rather than blocking the runner; the empty-string sentinel is
//! the in-band end-of-stream marker.

use tokio::sync::mpsc;

pub type LogSink = mpsc::Sender<String>;
pub type LogSource = mpsc::Receiver<String>;

/// Size used by the dispatcher when `save_log` is true.
pub const DEFAULT_LOG_BUFFER: usize = 100;

pub fn log_channel(capacity: usize) -> (LogSink, LogSource) {
    mpsc::channel(capacity.max(1))
}

/// Attempt to enqueue a line; silently drops it if the sink is full or
/// closed. Never blocks.
pub fn send_log_line(sink: Option<&LogSink>, line: impl Into<String>) {
    if let Some(sink) = sink {
        let _ = sink.try_send(line.into());
    }
}

/// Marks end-of-stream for the receiving forwarder.
pub fn send_log_end(sink: Option<&LogSink>) {
    send_log_line(sink, String::new());
}

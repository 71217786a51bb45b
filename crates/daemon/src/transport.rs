// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event transport: a single persistent duplex WebSocket connection to
//! the API server, carrying inbound task events and outbound client events
//! (registration, heartbeat pings, task updates) multiplexed over one
//! sentinel-framed byte stream.
//!
//! Reconnection is a sequential supervisory loop rather than a
//! concurrency-guarded reconnect flag: only one connection attempt is ever
//! in flight, which gets the same "never reconnect twice at once" guarantee
//! a flag would, without a separate lock. A read that sits idle past
//! `read_timeout` (nothing arrives, not even a dropped connection) is
//! treated the same as a hard socket error and forces a reconnect.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

use wn_core::{Category, TaskId, WorkerIdentity};
use wn_dispatch::TaskUpdateSink;
use wn_wire::{
    build_frames, decode_task_event, encode_client_event, ClientEvent, FrameMode, FrameReader,
    TaskEvent,
};

use crate::config::Config;
use crate::error::TransportError;

/// Owns the outbound half of the connection. Cloned freely; every clone
/// shares the same underlying channel into the writer loop, so sending a
/// task update never blocks on the network itself.
#[derive(Clone)]
pub struct EventTransport {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    worker_id: wn_core::WorkerId,
    api_key: String,
    chunk_threshold: usize,
    chunk_size: usize,
}

impl EventTransport {
    /// Spawns the supervisory loop and returns immediately; the first
    /// connection attempt happens in the background.
    pub fn spawn(
        config: Arc<Config>,
        worker: WorkerIdentity,
        categories: Vec<Category>,
        task_tx: mpsc::Sender<TaskEvent>,
    ) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let handle = Self {
            outbound: outbound_tx,
            worker_id: worker.id,
            api_key: config.api_key.clone(),
            chunk_threshold: config.chunk_threshold,
            chunk_size: config.chunk_size,
        };
        tokio::spawn(supervise(config, worker, categories, task_tx, outbound_rx));
        handle
    }

    fn enqueue(&self, event: &ClientEvent) {
        let Ok(payload) = encode_client_event(event) else {
            warn!("failed to encode outbound client event");
            return;
        };
        for frame in build_frames(&payload, self.chunk_threshold, self.chunk_size) {
            if self.outbound.send(frame).is_err() {
                warn!("event transport writer is gone, dropping outbound frame");
                break;
            }
        }
    }
}

#[async_trait]
impl TaskUpdateSink for EventTransport {
    async fn send_task_update(&self, task_id: TaskId, data: Value) {
        let event = ClientEvent::task_update(self.worker_id, task_id, data, self.api_key.clone());
        self.enqueue(&event);
    }
}

/// Connect, serve, sleep on failure, repeat — forever. Exits only when the
/// `task_tx` receiver is dropped (the process is shutting down) or the
/// outbound sender handle returned by [`EventTransport::spawn`] is gone.
async fn supervise(
    config: Arc<Config>,
    worker: WorkerIdentity,
    categories: Vec<Category>,
    task_tx: mpsc::Sender<TaskEvent>,
    mut outbound_rx: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    loop {
        match connect_and_serve(&config, &worker, &categories, &task_tx, &mut outbound_rx).await {
            Ok(()) => {
                info!("event transport shutting down");
                return;
            }
            Err(err) => {
                warn!(%err, "event transport connection lost, reconnecting");
            }
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }
}

async fn connect_and_serve(
    config: &Config,
    worker: &WorkerIdentity,
    categories: &[Category],
    task_tx: &mpsc::Sender<TaskEvent>,
    outbound_rx: &mut mpsc::UnboundedReceiver<Vec<u8>>,
) -> Result<(), TransportError> {
    let ws_url = config.ws_url();
    let (stream, _) = tokio_tungstenite::connect_async(&ws_url)
        .await
        .map_err(|_| TransportError::Connect(ws_url.clone()))?;
    let (mut write, mut read) = stream.split();

    let registration = ClientEvent::regist_worker(worker, config.api_key.clone());
    send_framed(
        &mut write,
        &registration,
        config.chunk_threshold,
        config.chunk_size,
        config.write_timeout,
    )
    .await?;
    info!(worker_id = %worker.id, "registered with API server");

    run_host_prep(categories).await;

    let mut frames = FrameReader::new(FrameMode::Sentinel);
    let mut heartbeat = tokio::time::interval(config.ping_interval);
    heartbeat.tick().await; // the first tick fires immediately; skip it

    loop {
        tokio::select! {
            incoming = tokio::time::timeout(config.read_timeout, read.next()) => {
                match incoming {
                    Err(_) => return Err(TransportError::ReadTimeout(config.read_timeout)),
                    Ok(Some(Ok(Message::Binary(bytes)))) => {
                        for payload in frames.feed(&bytes) {
                            match decode_task_event(&payload) {
                                Ok(event) => {
                                    if task_tx.send(event).await.is_err() {
                                        return Ok(());
                                    }
                                }
                                Err(err) => warn!(%err, "malformed task event, dropping frame"),
                            }
                        }
                    }
                    Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {
                        return Err(TransportError::Connect(ws_url));
                    }
                    Ok(Some(Ok(_))) => {}
                    Ok(Some(Err(err))) => return Err(TransportError::Socket(err)),
                }
            }
            outgoing = outbound_rx.recv() => {
                match outgoing {
                    Some(bytes) => send_message(&mut write, Message::Binary(bytes.into()), config.write_timeout).await?,
                    None => return Ok(()),
                }
            }
            _ = heartbeat.tick() => {
                let ping = ClientEvent::ping(worker.id, config.api_key.clone());
                send_framed(&mut write, &ping, config.chunk_threshold, config.chunk_size, config.write_timeout).await?;
            }
        }
    }
}

async fn send_framed<S>(
    write: &mut S,
    event: &ClientEvent,
    chunk_threshold: usize,
    chunk_size: usize,
    write_timeout: std::time::Duration,
) -> Result<(), TransportError>
where
    S: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let payload = encode_client_event(event)?;
    for frame in build_frames(&payload, chunk_threshold, chunk_size) {
        send_message(write, Message::Binary(frame.into()), write_timeout).await?;
    }
    Ok(())
}

async fn send_message<S>(
    write: &mut S,
    message: Message,
    write_timeout: std::time::Duration,
) -> Result<(), TransportError>
where
    S: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    match tokio::time::timeout(write_timeout, write.send(message)).await {
        Ok(result) => result.map_err(TransportError::Socket),
        Err(_) => Err(TransportError::WriteTimeout(write_timeout)),
    }
}

/// Runs each supported category's check script; on failure runs setup and
/// re-checks once, best-effort. Runs once per successful connect and is not
/// retried beyond that single setup attempt.
pub async fn run_host_prep(categories: &[Category]) {
    for category in categories {
        if run_snippet(category.check.as_deref()).await {
            continue;
        }
        if let Some(setup) = category.setup.as_deref() {
            info!(category = %category.code, "check failed, running setup");
            run_snippet(Some(setup)).await;
            if !run_snippet(category.check.as_deref()).await {
                warn!(category = %category.code, "check still failing after setup");
            }
        }
    }
}

/// Teardown is run best-effort on clean shutdown; failures are logged, not
/// propagated.
pub async fn run_teardown(categories: &[Category]) {
    for category in categories {
        if let Some(teardown) = category.teardown.as_deref() {
            run_snippet(Some(teardown)).await;
        }
    }
}

/// `None` (no snippet configured) counts as success. Runs the snippet
/// through `bash -c`; a missing exit status (spawn failure) counts as
/// failure.
async fn run_snippet(snippet: Option<&str>) -> bool {
    let Some(snippet) = snippet else {
        return true;
    };
    match tokio::process::Command::new("bash")
        .arg("-c")
        .arg(snippet)
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(err) => {
            warn!(%err, "failed to spawn host-prep snippet");
            false
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

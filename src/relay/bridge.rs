//! Async message sources feeding an `EventWatcher`
//!
//! The watcher itself is synchronous. The bridge only decides where messages
//! come from and makes sure callbacks run without the watcher lock held, so a
//! callback may reconfigure the watcher it was called from.

use crate::dispatch::invoke_all;
use crate::error::{RelayError, RelayResult};
use crate::relay::watcher::{Delivery, EventWatcher};
use crate::relay::InboundMessage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;

/// Source of decoded front-end messages
#[async_trait]
pub trait MessageSource: Send {
    /// Next message, or `None` once the source is exhausted
    async fn next_message(&mut self) -> RelayResult<Option<InboundMessage>>;
}

/// Messages pushed by the host transport over a tokio channel
pub struct ChannelSource {
    receiver: mpsc::Receiver<InboundMessage>,
}

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<InboundMessage>) -> Self {
        Self { receiver }
    }

    /// Channel pair with room for `capacity` pending messages
    pub fn channel(capacity: usize) -> (mpsc::Sender<InboundMessage>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next_message(&mut self) -> RelayResult<Option<InboundMessage>> {
        Ok(self.receiver.recv().await)
    }
}

/// Newline-delimited JSON messages, one object per line
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MessageSource for JsonLinesSource<R> {
    async fn next_message(&mut self) -> RelayResult<Option<InboundMessage>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value = serde_json::from_str(line).map_err(|e| {
                tracing::warn!("Malformed message on line {}: {}", self.line_number, e);
                RelayError::Decode(e)
            })?;
            return InboundMessage::from_json(value).map(Some);
        }
        Ok(None)
    }
}

/// Feed every message from `source` into `watcher` until the source ends.
///
/// Returns the number of messages handled. A failing callback stops the pump
/// and its error is returned.
pub async fn pump<S: MessageSource>(
    watcher: Arc<Mutex<EventWatcher>>,
    mut source: S,
) -> RelayResult<usize> {
    let model_id = watcher.lock().model_id();
    tracing::info!("Relay started for watcher {}", model_id);

    let mut handled = 0;
    while let Some(message) = source.next_message().await? {
        // The guard is dropped before any callback runs
        let delivery = watcher.lock().prepare(message);
        if let Delivery::Dispatch(payload, callbacks) = delivery {
            invoke_all(&callbacks, &payload).map_err(RelayError::Callback)?;
        }
        handled += 1;
    }

    tracing::info!("Relay stopped for watcher {} after {} message(s)", model_id, handled);
    Ok(handled)
}

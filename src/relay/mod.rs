//! Host-side relay of front-end messages
//!
//! The front-end sends two kinds of messages: DOM event messages, which are
//! fanned out to callbacks, and `xy` state updates carrying the latest mouse
//! position. `EventWatcher` routes both; `bridge` feeds it from async sources.

pub mod bridge;
pub mod watcher;

pub use bridge::{pump, ChannelSource, JsonLinesSource, MessageSource};
pub use watcher::{Delivery, EventWatcher};

use crate::error::RelayResult;
use crate::payload::EventPayload;
use serde::Deserialize;
use serde_json::Value;

/// A message decoded from the front-end transport
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    DomEvent(EventPayload),
    /// Mouse position in the selected coordinate system
    Xy(f64, f64),
}

#[derive(Deserialize)]
struct XyUpdate {
    xy: (f64, f64),
}

impl InboundMessage {
    /// Decode a JSON message. An object with `xy` and neither an `event` nor
    /// a `type` key is a state update; any other object is a DOM event.
    pub fn from_json(value: Value) -> RelayResult<Self> {
        let is_xy_update = value.as_object().is_some_and(|map| {
            map.contains_key("xy") && !map.contains_key("event") && !map.contains_key("type")
        });
        if is_xy_update {
            let update: XyUpdate = serde_json::from_value(value)?;
            return Ok(InboundMessage::Xy(update.xy.0, update.xy.1));
        }
        Ok(InboundMessage::DomEvent(serde_json::from_value(value)?))
    }
}

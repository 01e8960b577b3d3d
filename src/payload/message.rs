//! Event message model
//!
//! `EventPayload` is the message a callback receives. The field catalog lists
//! the keys the front-end copies out of each kind of DOM event.

use crate::watch::error::{WatchError, WatchResult};
use crate::watch::types::{supported_events, CoordinateSystem, EventKind, MODIFIER_KEYS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Keys copied from a DOM event into the message sent to the host. The
// resulting message also carries `event`, a copy of `type`.

const COMMON_FIELDS: &[&str] = &["altKey", "ctrlKey", "metaKey", "shiftKey", "type", "timeStamp"];

const MOUSE_STANDARD_FIELDS: &[&str] = &[
    "button",
    "buttons",
    "clientX",
    "clientY",
    "layerX",
    "layerY",
    "movementX",
    "movementY",
    "offsetX",
    "offsetY",
    "pageX",
    "pageY",
    "screenX",
    "screenY",
    "x",
    "y",
];

const MOUSE_ADDED_FIELDS: &[&str] = &[
    "dataX",
    "dataY",
    "relativeX",
    "relativeY",
    "boundingRectWidth",
    "boundingRectHeight",
    "boundingRectTop",
    "boundingRectLeft",
    "boundingRectBottom",
    "boundingRectRight",
    // Deprecated aliases of dataX/dataY
    "arrayX",
    "arrayY",
];

const WHEEL_FIELDS: &[&str] = &["deltaX", "deltaY", "deltaZ", "deltaMode"];

const DRAG_FIELDS: &[&str] = &["dataTransfer"];

const KEY_FIELDS: &[&str] = &["code", "key", "location", "repeat"];

const TOUCH_FIELDS: &[&str] = &["changedTouches", "targetTouches", "touches"];

/// Keys a message for `event_type` carries, in order. `None` for unsupported events.
pub fn message_fields(event_type: &str) -> Option<Vec<&'static str>> {
    let kind = EventKind::classify(event_type)?;
    let mut fields = COMMON_FIELDS.to_vec();
    match kind {
        EventKind::Mouse => {
            fields.extend_from_slice(MOUSE_STANDARD_FIELDS);
            fields.extend_from_slice(MOUSE_ADDED_FIELDS);
            if event_type == "wheel" {
                fields.extend_from_slice(WHEEL_FIELDS);
            } else if event_type == "drop" || event_type.starts_with("drag") {
                fields.extend_from_slice(DRAG_FIELDS);
            }
        }
        EventKind::Keyboard => fields.extend_from_slice(KEY_FIELDS),
        EventKind::Touch => fields.extend_from_slice(TOUCH_FIELDS),
    }
    Some(fields)
}

/// One event message as delivered to callbacks.
///
/// The content is passed through as received; accessors only read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventPayload(Map<String, Value>);

impl EventPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build the message for a raw DOM event object, keeping only the keys
    /// its event kind reports. Absent keys are sent as `null`.
    pub fn from_dom_event(raw: &Map<String, Value>) -> WatchResult<Self> {
        let event_type = raw.get("type").and_then(Value::as_str).unwrap_or_default();
        let fields = message_fields(event_type).ok_or_else(|| WatchError::InvalidEventName {
            bad: vec![event_type.to_string()],
            supported: supported_events().into_iter().map(String::from).collect(),
        })?;

        let mut message = Map::new();
        for name in fields {
            message.insert(name.to_string(), raw.get(name).cloned().unwrap_or(Value::Null));
        }
        message.insert("event".to_string(), Value::String(event_type.to_string()));
        Ok(Self(message))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Event name from `event`, falling back to `type`
    pub fn event_type(&self) -> Option<&str> {
        self.0
            .get("event")
            .or_else(|| self.0.get("type"))
            .and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<EventKind> {
        self.event_type().and_then(EventKind::classify)
    }

    /// `key` of a keyboard event
    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(Value::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Position in `system`, read from `<system>X` / `<system>Y`.
    pub fn coordinates(&self, system: CoordinateSystem) -> Option<(f64, f64)> {
        let (x_key, y_key) = system.message_keys();
        Some((self.number(&x_key)?, self.number(&y_key)?))
    }

    /// Key event for a lone modifier such as `Shift`
    pub fn is_modifier_key_event(&self) -> bool {
        self.kind() == Some(EventKind::Keyboard)
            && self.key().is_some_and(|key| MODIFIER_KEYS.contains(&key))
    }
}

impl From<Map<String, Value>> for EventPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

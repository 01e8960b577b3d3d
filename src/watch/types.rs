//! Reference sets and enums for event watching
//!
//! The fixed lists of supported DOM events and the parsed forms of the
//! coordinate system and rate limiting choices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SUPPORTED_MOUSE_EVENTS: &[&str] = &[
    "click",
    "auxclick",
    "dblclick",
    "mouseenter",
    "mouseleave",
    "mousedown",
    "mouseup",
    "mousemove",
    "wheel",
    "contextmenu",
    "dragstart",
    "drag",
    "dragend",
    "dragenter",
    "dragover",
    "dragleave",
    "drop",
];

pub const SUPPORTED_KEY_EVENTS: &[&str] = &["keydown", "keyup"];

pub const SUPPORTED_TOUCH_EVENTS: &[&str] = &["touchstart", "touchend", "touchmove", "touchcancel"];

/// Keys dropped when `ignore_modifier_key_events` is set.
pub const MODIFIER_KEYS: &[&str] = &["Shift", "Control", "Alt", "Meta"];

/// Mouse, key and touch events in that order.
pub fn supported_events() -> Vec<&'static str> {
    SUPPORTED_MOUSE_EVENTS
        .iter()
        .chain(SUPPORTED_KEY_EVENTS)
        .chain(SUPPORTED_TOUCH_EVENTS)
        .copied()
        .collect()
}

pub fn is_supported_event(name: &str) -> bool {
    SUPPORTED_MOUSE_EVENTS.contains(&name)
        || SUPPORTED_KEY_EVENTS.contains(&name)
        || SUPPORTED_TOUCH_EVENTS.contains(&name)
}

/// Broad family a DOM event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Mouse,
    Keyboard,
    Touch,
}

impl EventKind {
    /// Classify a supported event name. Unknown names yield `None`.
    pub fn classify(event_type: &str) -> Option<Self> {
        if SUPPORTED_MOUSE_EVENTS.contains(&event_type) {
            Some(EventKind::Mouse)
        } else if SUPPORTED_KEY_EVENTS.contains(&event_type) {
            Some(EventKind::Keyboard)
        } else if SUPPORTED_TOUCH_EVENTS.contains(&event_type) {
            Some(EventKind::Touch)
        } else {
            None
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Mouse => write!(f, "mouse"),
            EventKind::Keyboard => write!(f, "keyboard"),
            EventKind::Touch => write!(f, "touch"),
        }
    }
}

/// Reference frame for a reported mouse position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// "Natural" coordinates of the widget, e.g. image pixels
    Data,
    /// Relative to the visible part of the page
    Client,
    /// Relative to the padding edge of the element
    Offset,
    /// Relative to the whole document
    Page,
    /// Relative to the element's bounding box
    Relative,
    /// Relative to the screen
    Screen,
}

impl CoordinateSystem {
    pub const ALL: [CoordinateSystem; 6] = [
        CoordinateSystem::Data,
        CoordinateSystem::Client,
        CoordinateSystem::Offset,
        CoordinateSystem::Page,
        CoordinateSystem::Relative,
        CoordinateSystem::Screen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Data => "data",
            CoordinateSystem::Client => "client",
            CoordinateSystem::Offset => "offset",
            CoordinateSystem::Page => "page",
            CoordinateSystem::Relative => "relative",
            CoordinateSystem::Screen => "screen",
        }
    }

    /// Message keys holding the position in this system, e.g. `clientX`/`clientY`.
    pub fn message_keys(&self) -> (String, String) {
        (format!("{}X", self.as_str()), format!("{}Y", self.as_str()))
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoordinateSystem::ALL
            .into_iter()
            .find(|system| system.as_str() == s)
            .ok_or(())
    }
}

/// How the front-end slows down event delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitMethod {
    /// At most one event per `wait` interval
    Throttle,
    /// Deliver once no event has arrived for `wait` milliseconds
    Debounce,
}

impl RateLimitMethod {
    pub const ALL: [RateLimitMethod; 2] = [RateLimitMethod::Throttle, RateLimitMethod::Debounce];

    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitMethod::Throttle => "throttle",
            RateLimitMethod::Debounce => "debounce",
        }
    }
}

impl fmt::Display for RateLimitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateLimitMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RateLimitMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or(())
    }
}

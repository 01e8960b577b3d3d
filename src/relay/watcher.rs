//! Host-side event watcher
//!
//! `EventWatcher` pairs one validated configuration with its subscribers and
//! routes each front-end message to them.

use crate::dispatch::{Callback, DispatchRegistry};
use crate::error::{RelayError, RelayResult};
use crate::payload::EventPayload;
use crate::relay::InboundMessage;
use crate::watch::{EventWatchConfig, WatchResult};
use serde_json::Value;
use uuid::Uuid;

/// What `prepare` decided to do with an inbound message
#[derive(Debug)]
pub enum Delivery {
    /// Hand the payload to these callbacks
    Dispatch(EventPayload, Vec<Callback>),
    /// Nothing to deliver; the message was applied or dropped
    Handled,
}

/// Host-side half of one event watch.
///
/// Owns the validated configuration, the subscribers and the last mouse
/// position reported by the front-end.
#[derive(Debug)]
pub struct EventWatcher {
    model_id: Uuid,
    config: EventWatchConfig,
    handlers: DispatchRegistry,
    xy: Option<(f64, f64)>,
}

impl Default for EventWatcher {
    fn default() -> Self {
        Self::with_config(EventWatchConfig::default())
    }
}

impl EventWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EventWatchConfig) -> Self {
        let model_id = Uuid::new_v4();
        tracing::debug!("Event watcher {} created", model_id);
        Self {
            model_id,
            config,
            handlers: DispatchRegistry::new(),
            xy: None,
        }
    }

    pub fn model_id(&self) -> Uuid {
        self.model_id
    }

    pub fn config(&self) -> &EventWatchConfig {
        &self.config
    }

    pub fn handlers(&self) -> &DispatchRegistry {
        &self.handlers
    }

    /// Last reported mouse position, if a coordinate system is selected
    pub fn xy(&self) -> Option<(f64, f64)> {
        self.xy
    }

    pub fn set_watched_events<I, S>(&mut self, names: I) -> WatchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.set_watched_events(names)
    }

    pub fn set_ignore_modifier_key_events(&mut self, ignore: bool) {
        self.config.set_ignore_modifier_key_events(ignore);
    }

    pub fn set_prevent_default_action(&mut self, prevent: bool) {
        self.config.set_prevent_default_action(prevent);
    }

    /// Changing the coordinate system drops the stored position, matching
    /// the front-end which resets `xy` whenever it re-attaches listeners.
    pub fn set_xy_coordinate_system(&mut self, value: Option<&str>) -> WatchResult<()> {
        self.config.set_xy_coordinate_system(value)?;
        self.xy = None;
        Ok(())
    }

    pub fn set_wait(&mut self, value: i64) -> WatchResult<()> {
        self.config.set_wait(value)
    }

    pub fn set_throttle_or_debounce(&mut self, value: Option<&str>) -> WatchResult<()> {
        self.config.set_throttle_or_debounce(value)
    }

    /// Set one field from an untyped JSON value, checking its type first.
    ///
    /// A successful change of `xy_coordinate_system` drops the stored position.
    pub fn apply_update(&mut self, field: &str, value: &Value) -> WatchResult<()> {
        self.config.apply_update(field, value)?;
        if field == "xy_coordinate_system" {
            self.xy = None;
        }
        Ok(())
    }

    /// Register `callback` for DOM events, or remove it when `remove` is set.
    ///
    /// Callbacks receive the event message; its keys depend on the event type.
    pub fn on_dom_event(&mut self, callback: Callback, remove: bool) {
        self.handlers.register_callback(callback, remove);
    }

    pub fn reset_callbacks(&mut self) {
        self.handlers.reset();
    }

    /// Apply state updates and pick the callbacks for an event, without
    /// running them. Used by the bridge so callbacks run outside its lock.
    pub fn prepare(&mut self, message: InboundMessage) -> Delivery {
        match message {
            InboundMessage::DomEvent(payload) => {
                if self.config.ignore_modifier_key_events() && payload.is_modifier_key_event() {
                    tracing::debug!("Dropping modifier key event {:?}", payload.key());
                    return Delivery::Handled;
                }
                tracing::debug!(
                    "Dispatching {} event to {} callback(s)",
                    payload.event_type().unwrap_or("unknown"),
                    self.handlers.len()
                );
                Delivery::Dispatch(payload, self.handlers.snapshot())
            }
            InboundMessage::Xy(x, y) => {
                if self.config.xy_coordinate_system().is_some() {
                    self.xy = Some((x, y));
                } else {
                    tracing::warn!("Ignoring xy update ({}, {}) with no coordinate system set", x, y);
                }
                Delivery::Handled
            }
        }
    }

    /// Handle one inbound message synchronously on the caller's thread.
    pub fn handle_message(&mut self, message: InboundMessage) -> RelayResult<()> {
        match self.prepare(message) {
            Delivery::Dispatch(payload, callbacks) => {
                crate::dispatch::invoke_all(&callbacks, &payload).map_err(RelayError::Callback)
            }
            Delivery::Handled => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use crate::watch::WatchError;
    use serde_json::json;
    use std::sync::Arc;

    fn payload(value: Value) -> EventPayload {
        serde_json::from_value(value).unwrap()
    }

    fn collecting(seen: &Arc<Mutex<Vec<String>>>) -> Callback {
        let seen = Arc::clone(seen);
        Callback::new(move |payload: &EventPayload| {
            seen.lock()
                .push(payload.event_type().unwrap_or_default().to_string());
            Ok(())
        })
    }

    #[test]
    fn test_fresh_watchers_get_distinct_ids() {
        assert_ne!(EventWatcher::new().model_id(), EventWatcher::new().model_id());
    }

    #[test]
    fn test_dom_events_reach_callbacks() {
        let mut watcher = EventWatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        watcher.on_dom_event(collecting(&seen), false);

        watcher
            .handle_message(InboundMessage::DomEvent(payload(json!({"event": "click"}))))
            .unwrap();
        watcher
            .handle_message(InboundMessage::DomEvent(payload(json!({"event": "keyup", "key": "a"}))))
            .unwrap();

        assert_eq!(*seen.lock(), vec!["click", "keyup"]);
    }

    #[test]
    fn test_on_dom_event_remove_and_reset() {
        let mut watcher = EventWatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = collecting(&seen);
        let second = collecting(&seen);

        watcher.on_dom_event(first.clone(), false);
        watcher.on_dom_event(second.clone(), false);
        assert_eq!(watcher.handlers().callbacks(), &[first.clone(), second.clone()]);

        watcher.on_dom_event(second, true);
        assert_eq!(watcher.handlers().callbacks(), &[first]);

        watcher.reset_callbacks();
        assert!(watcher.handlers().is_empty());
    }

    #[test]
    fn test_modifier_keys_dropped_when_ignored() {
        let mut watcher = EventWatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        watcher.on_dom_event(collecting(&seen), false);
        let shift = json!({"event": "keydown", "key": "Shift"});

        watcher
            .handle_message(InboundMessage::DomEvent(payload(shift.clone())))
            .unwrap();
        assert_eq!(seen.lock().len(), 1);

        watcher.set_ignore_modifier_key_events(true);
        watcher
            .handle_message(InboundMessage::DomEvent(payload(shift)))
            .unwrap();
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_xy_only_stored_with_coordinate_system() {
        let mut watcher = EventWatcher::new();

        watcher.handle_message(InboundMessage::Xy(3.0, 4.0)).unwrap();
        assert_eq!(watcher.xy(), None);

        watcher.set_xy_coordinate_system(Some("client")).unwrap();
        watcher.handle_message(InboundMessage::Xy(3.0, 4.0)).unwrap();
        assert_eq!(watcher.xy(), Some((3.0, 4.0)));

        watcher.set_xy_coordinate_system(Some("page")).unwrap();
        assert_eq!(watcher.xy(), None);
    }

    #[test]
    fn test_rejected_coordinate_system_keeps_xy() {
        let mut watcher = EventWatcher::new();
        watcher.set_xy_coordinate_system(Some("relative")).unwrap();
        watcher.handle_message(InboundMessage::Xy(1.0, 2.0)).unwrap();

        assert!(watcher.set_xy_coordinate_system(Some("bogus")).is_err());
        assert_eq!(watcher.xy(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_fractional_wait_update_is_a_type_error() {
        let mut watcher = EventWatcher::new();

        let err = watcher.apply_update("wait", &json!(15.0)).unwrap_err();

        assert!(matches!(err, WatchError::InvalidType { ref field, .. } if field == "wait"));
        assert_eq!(watcher.config().wait(), 0);
        assert_eq!(watcher.config().throttle_or_debounce(), None);

        watcher.apply_update("wait", &json!(15)).unwrap();
        assert_eq!(watcher.config().wait(), 15);
    }

    #[test]
    fn test_coordinate_system_update_clears_xy() {
        let mut watcher = EventWatcher::new();
        watcher
            .apply_update("xy_coordinate_system", &json!("client"))
            .unwrap();
        watcher.handle_message(InboundMessage::Xy(5.0, 6.0)).unwrap();

        // Rejected and unrelated updates leave the position alone
        assert!(watcher
            .apply_update("xy_coordinate_system", &json!(3))
            .is_err());
        watcher.apply_update("prevent_default_action", &json!(true)).unwrap();
        assert_eq!(watcher.xy(), Some((5.0, 6.0)));

        watcher
            .apply_update("xy_coordinate_system", &json!("page"))
            .unwrap();
        assert_eq!(watcher.xy(), None);
    }

    #[test]
    fn test_callback_error_is_surfaced() {
        let mut watcher = EventWatcher::new();
        watcher.on_dom_event(Callback::new(|_: &EventPayload| anyhow::bail!("handler failed")), false);

        let err = watcher
            .handle_message(InboundMessage::DomEvent(payload(json!({"event": "click"}))))
            .unwrap_err();
        assert!(matches!(err, RelayError::Callback(_)));
        assert_eq!(err.to_string(), "Callback error: handler failed");
    }

    #[test]
    fn test_setters_delegate_to_config() {
        let mut watcher = EventWatcher::new();
        watcher.set_watched_events(["wheel"]).unwrap();
        watcher.set_prevent_default_action(true);
        watcher.set_throttle_or_debounce(Some("debounce")).unwrap();
        watcher.set_wait(15).unwrap();

        let config = watcher.config();
        assert_eq!(config.watched_events(), &["wheel"]);
        assert!(config.prevent_default_action());
        assert_eq!(config.wait(), 15);
        assert_eq!(
            config.throttle_or_debounce(),
            Some(crate::watch::RateLimitMethod::Debounce)
        );
    }
}

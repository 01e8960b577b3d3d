//! Validated event watch configuration
//!
//! `EventWatchConfig` holds what the front-end should observe and how it should
//! report it. All fields are private and change only through setters that
//! validate first and commit second.

use crate::watch::error::{WatchError, WatchResult};
use crate::watch::settings::WatchSettings;
use crate::watch::types::{
    is_supported_event, supported_events, CoordinateSystem, RateLimitMethod, MODIFIER_KEYS,
    SUPPORTED_KEY_EVENTS, SUPPORTED_MOUSE_EVENTS, SUPPORTED_TOUCH_EVENTS,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventWatchConfig {
    watched_events: Vec<String>,
    ignore_modifier_key_events: bool,
    prevent_default_action: bool,
    xy_coordinate_system: Option<CoordinateSystem>,
    wait: u64,
    throttle_or_debounce: Option<RateLimitMethod>,
}

impl EventWatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config by applying `settings` through the validated setters.
    ///
    /// `wait` goes first and may auto-select `throttle`. A method named in the
    /// document, null included, is applied after it and wins.
    pub fn from_settings(settings: &WatchSettings) -> WatchResult<Self> {
        let mut config = Self::new();
        config.set_watched_events(settings.watched_events.iter().cloned())?;
        config.set_ignore_modifier_key_events(settings.ignore_modifier_key_events);
        config.set_prevent_default_action(settings.prevent_default_action);
        config.set_xy_coordinate_system(settings.xy_coordinate_system.as_deref())?;
        if let Some(wait) = settings.wait {
            config.set_wait(wait)?;
        }
        if let Some(method) = &settings.throttle_or_debounce {
            config.set_throttle_or_debounce(method.as_deref())?;
        }
        Ok(config)
    }

    /// Current state in the synced settings shape.
    pub fn snapshot(&self) -> WatchSettings {
        WatchSettings {
            watched_events: self.watched_events.clone(),
            ignore_modifier_key_events: self.ignore_modifier_key_events,
            prevent_default_action: self.prevent_default_action,
            xy_coordinate_system: self.xy_coordinate_system.map(|s| s.as_str().to_string()),
            wait: Some(self.wait as i64),
            throttle_or_debounce: Some(self.throttle_or_debounce.map(|m| m.as_str().to_string())),
        }
    }

    pub fn watched_events(&self) -> &[String] {
        &self.watched_events
    }

    pub fn ignore_modifier_key_events(&self) -> bool {
        self.ignore_modifier_key_events
    }

    pub fn prevent_default_action(&self) -> bool {
        self.prevent_default_action
    }

    pub fn xy_coordinate_system(&self) -> Option<CoordinateSystem> {
        self.xy_coordinate_system
    }

    /// Rate limiting interval in milliseconds
    pub fn wait(&self) -> u64 {
        self.wait
    }

    pub fn throttle_or_debounce(&self) -> Option<RateLimitMethod> {
        self.throttle_or_debounce
    }

    pub fn supported_mouse_events(&self) -> &'static [&'static str] {
        SUPPORTED_MOUSE_EVENTS
    }

    pub fn supported_key_events(&self) -> &'static [&'static str] {
        SUPPORTED_KEY_EVENTS
    }

    pub fn supported_touch_events(&self) -> &'static [&'static str] {
        SUPPORTED_TOUCH_EVENTS
    }

    /// Allowed coordinate systems. `None` (not tracking) is always accepted too.
    pub fn supported_coordinate_systems(&self) -> &'static [CoordinateSystem] {
        &CoordinateSystem::ALL
    }

    pub fn supported_rate_limit_methods(&self) -> &'static [RateLimitMethod] {
        &RateLimitMethod::ALL
    }

    pub fn modifier_keys(&self) -> &'static [&'static str] {
        MODIFIER_KEYS
    }

    /// Replace the watched events. Every name must be supported; on failure
    /// all offending names are reported and nothing changes.
    pub fn set_watched_events<I, S>(&mut self, names: I) -> WatchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let bad: Vec<String> = names
            .iter()
            .filter(|name| !is_supported_event(name))
            .cloned()
            .collect();
        if !bad.is_empty() {
            return Err(WatchError::InvalidEventName {
                bad,
                supported: supported_events().into_iter().map(String::from).collect(),
            });
        }

        tracing::debug!("Watching events {:?}", names);
        self.watched_events = names;
        Ok(())
    }

    pub fn set_ignore_modifier_key_events(&mut self, ignore: bool) {
        self.ignore_modifier_key_events = ignore;
    }

    pub fn set_prevent_default_action(&mut self, prevent: bool) {
        self.prevent_default_action = prevent;
    }

    pub fn set_xy_coordinate_system(&mut self, value: Option<&str>) -> WatchResult<()> {
        let system = match value {
            None => None,
            Some(raw) => Some(raw.parse::<CoordinateSystem>().map_err(|_| {
                WatchError::InvalidCoordinateSystem {
                    value: raw.to_string(),
                    allowed: allowed_names(CoordinateSystem::ALL.iter().map(|s| s.as_str())),
                }
            })?),
        };

        tracing::debug!("Coordinate system set to {:?}", system);
        self.xy_coordinate_system = system;
        Ok(())
    }

    /// Set the rate limiting interval. Picks `throttle` when no method has
    /// been chosen yet; an existing choice is left alone.
    pub fn set_wait(&mut self, value: i64) -> WatchResult<()> {
        if value < 0 {
            return Err(WatchError::InvalidWaitValue(value));
        }

        self.wait = value as u64;
        if self.throttle_or_debounce.is_none() {
            tracing::debug!("wait set to {}ms with no method chosen, selecting throttle", value);
            self.throttle_or_debounce = Some(RateLimitMethod::Throttle);
        }
        Ok(())
    }

    /// Does not touch `wait`.
    pub fn set_throttle_or_debounce(&mut self, value: Option<&str>) -> WatchResult<()> {
        let method = match value {
            None => None,
            Some(raw) => Some(raw.parse::<RateLimitMethod>().map_err(|_| {
                WatchError::InvalidRateLimitMethod {
                    value: raw.to_string(),
                    allowed: allowed_names(RateLimitMethod::ALL.iter().map(|m| m.as_str())),
                }
            })?),
        };

        tracing::debug!("Rate limiting method set to {:?}", method);
        self.throttle_or_debounce = method;
        Ok(())
    }
}

/// Allowed values as reported in errors, led by the null choice.
fn allowed_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    std::iter::once("null")
        .chain(names)
        .map(String::from)
        .collect()
}

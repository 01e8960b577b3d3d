//! Settings document and field-level updates
//!
//! `WatchSettings` is the serialized shape of an `EventWatchConfig`, using the
//! same field names the front-end syncs. Values coming from JSON go through
//! `apply_update`, which checks the JSON type before the typed setter runs its
//! range checks.

use crate::error::RelayResult;
use crate::watch::config::EventWatchConfig;
use crate::watch::error::{WatchError, WatchResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    pub watched_events: Vec<String>,
    pub ignore_modifier_key_events: bool,
    pub prevent_default_action: bool,
    pub xy_coordinate_system: Option<String>,
    /// Left unset unless given, so loading a document without `wait` does not
    /// pick a rate limiting method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<i64>,
    /// Outer `None` when the key is absent, `Some(None)` for an explicit null.
    /// An explicit value, null included, overrides the method `wait` picks.
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub throttle_or_debounce: Option<Option<String>>,
}

/// Marks a key as present even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Read a settings document from a JSON file
pub fn load_settings(path: &Path) -> RelayResult<WatchSettings> {
    let content = std::fs::read_to_string(path)?;
    let settings: WatchSettings = serde_json::from_str(&content)?;
    tracing::info!("Loaded watch settings from {}", path.display());
    Ok(settings)
}

/// Write a settings document as pretty JSON
pub fn save_settings(path: &Path, settings: &WatchSettings) -> RelayResult<()> {
    let data = serde_json::to_vec_pretty(settings)?;
    std::fs::write(path, data)?;
    Ok(())
}

impl EventWatchConfig {
    /// Set one field from an untyped JSON value.
    ///
    /// A value of the wrong JSON type fails with `InvalidType` and never
    /// reaches the setter; e.g. `15.0` for `wait` is a type error, not a
    /// range error.
    pub fn apply_update(&mut self, field: &str, value: &Value) -> WatchResult<()> {
        match field {
            "watched_events" => {
                let items = value
                    .as_array()
                    .ok_or_else(|| type_error(field, "a list of strings", value))?;
                let names = items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(String::from)
                            .ok_or_else(|| type_error(field, "a list of strings", item))
                    })
                    .collect::<WatchResult<Vec<String>>>()?;
                self.set_watched_events(names)
            }
            "ignore_modifier_key_events" => {
                let flag = value
                    .as_bool()
                    .ok_or_else(|| type_error(field, "a boolean", value))?;
                self.set_ignore_modifier_key_events(flag);
                Ok(())
            }
            "prevent_default_action" => {
                let flag = value
                    .as_bool()
                    .ok_or_else(|| type_error(field, "a boolean", value))?;
                self.set_prevent_default_action(flag);
                Ok(())
            }
            "xy_coordinate_system" => {
                let system = optional_str(field, value)?;
                self.set_xy_coordinate_system(system)
            }
            "wait" => {
                if let Some(too_large) = value.as_u64().filter(|w| *w > i64::MAX as u64) {
                    return Err(WatchError::WaitOutOfRange(too_large));
                }
                let wait = value
                    .as_i64()
                    .ok_or_else(|| type_error(field, "an int", value))?;
                self.set_wait(wait)
            }
            "throttle_or_debounce" => {
                let method = optional_str(field, value)?;
                self.set_throttle_or_debounce(method)
            }
            other => Err(WatchError::UnknownField(other.to_string())),
        }
    }
}

fn optional_str<'a>(field: &str, value: &'a Value) -> WatchResult<Option<&'a str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        other => Err(type_error(field, "a string or null", other)),
    }
}

fn type_error(field: &str, expected: &'static str, found: &Value) -> WatchError {
    WatchError::InvalidType {
        field: field.to_string(),
        expected,
        found: describe(found),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("the bool {}", b),
        Value::Number(n) if n.is_f64() => format!("the float {}", n),
        Value::Number(n) => format!("the int {}", n),
        Value::String(s) => format!("the str {:?}", s),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "a dict".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use crate::watch::types::{CoordinateSystem, RateLimitMethod};
    use serde_json::json;

    #[test]
    fn test_floating_point_wait_raises_type_error() {
        let mut config = EventWatchConfig::new();

        let err = config.apply_update("wait", &json!(15.0)).unwrap_err();

        assert_eq!(
            err,
            WatchError::InvalidType {
                field: "wait".into(),
                expected: "an int",
                found: "the float 15.0".into(),
            }
        );
        assert!(err.to_string().contains("'wait' field"));
        assert_eq!(config.wait(), 0);
        assert_eq!(config.throttle_or_debounce(), None);
    }

    #[test]
    fn test_negative_wait_through_update_is_a_range_error() {
        let mut config = EventWatchConfig::new();
        let err = config.apply_update("wait", &json!(-20)).unwrap_err();
        assert_eq!(err, WatchError::InvalidWaitValue(-20));
    }

    #[test]
    fn test_updates_reach_setters() {
        let mut config = EventWatchConfig::new();
        config
            .apply_update("watched_events", &json!(["click", "wheel"]))
            .unwrap();
        config.apply_update("prevent_default_action", &json!(true)).unwrap();
        config
            .apply_update("ignore_modifier_key_events", &json!(true))
            .unwrap();
        config
            .apply_update("xy_coordinate_system", &json!("screen"))
            .unwrap();
        config.apply_update("wait", &json!(40)).unwrap();

        assert_eq!(config.watched_events(), &["click", "wheel"]);
        assert!(config.prevent_default_action());
        assert!(config.ignore_modifier_key_events());
        assert_eq!(config.xy_coordinate_system(), Some(CoordinateSystem::Screen));
        assert_eq!(config.wait(), 40);
        assert_eq!(config.throttle_or_debounce(), Some(RateLimitMethod::Throttle));

        config
            .apply_update("xy_coordinate_system", &Value::Null)
            .unwrap();
        assert_eq!(config.xy_coordinate_system(), None);
    }

    #[test]
    fn test_wrong_json_types_are_rejected() {
        let mut config = EventWatchConfig::new();
        assert!(matches!(
            config.apply_update("watched_events", &json!("click")),
            Err(WatchError::InvalidType { .. })
        ));
        assert!(matches!(
            config.apply_update("watched_events", &json!(["click", 3])),
            Err(WatchError::InvalidType { .. })
        ));
        assert!(matches!(
            config.apply_update("prevent_default_action", &json!(1)),
            Err(WatchError::InvalidType { .. })
        ));
        assert!(matches!(
            config.apply_update("throttle_or_debounce", &json!(false)),
            Err(WatchError::InvalidType { .. })
        ));
        assert_eq!(config, EventWatchConfig::new());
    }

    #[test]
    fn test_unknown_field() {
        let mut config = EventWatchConfig::new();
        assert_eq!(
            config.apply_update("source", &json!(null)),
            Err(WatchError::UnknownField("source".into()))
        );
    }

    #[test]
    fn test_settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.json");

        let settings = WatchSettings {
            watched_events: vec!["keydown".into(), "keyup".into()],
            ignore_modifier_key_events: true,
            wait: Some(250),
            throttle_or_debounce: Some(Some("debounce".into())),
            ..WatchSettings::default()
        };
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_settings_document_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.json");
        std::fs::write(&path, r#"{"watched_events": ["click"]}"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.watched_events, vec!["click".to_string()]);
        assert_eq!(loaded.wait, None);
        assert_eq!(loaded.xy_coordinate_system, None);
        assert_eq!(loaded.throttle_or_debounce, None);
    }

    #[test]
    fn test_explicit_null_method_is_kept_apart_from_missing() {
        let explicit: WatchSettings =
            serde_json::from_str(r#"{"wait": 50, "throttle_or_debounce": null}"#).unwrap();
        assert_eq!(explicit.throttle_or_debounce, Some(None));
        assert_eq!(
            EventWatchConfig::from_settings(&explicit)
                .unwrap()
                .throttle_or_debounce(),
            None
        );

        let missing: WatchSettings = serde_json::from_str(r#"{"wait": 50}"#).unwrap();
        assert_eq!(missing.throttle_or_debounce, None);
        assert_eq!(
            EventWatchConfig::from_settings(&missing)
                .unwrap()
                .throttle_or_debounce(),
            Some(RateLimitMethod::Throttle)
        );
    }

    #[test]
    fn test_cleared_method_survives_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.json");

        let mut config = EventWatchConfig::new();
        config.set_wait(50).unwrap();
        config.set_throttle_or_debounce(None).unwrap();
        save_settings(&path, &config.snapshot()).unwrap();

        let rebuilt = EventWatchConfig::from_settings(&load_settings(&path).unwrap()).unwrap();
        assert_eq!(rebuilt, config);
        assert_eq!(rebuilt.throttle_or_debounce(), None);
    }

    #[test]
    fn test_wait_beyond_i64_is_out_of_range() {
        let mut config = EventWatchConfig::new();
        let err = config.apply_update("wait", &json!(u64::MAX)).unwrap_err();

        assert_eq!(err, WatchError::WaitOutOfRange(u64::MAX));
        assert!(err.to_string().contains("18446744073709551615"));
        assert_eq!(config, EventWatchConfig::new());
    }

    #[test]
    fn test_malformed_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_settings(&path), Err(RelayError::Decode(_))));
        assert!(matches!(
            load_settings(&dir.path().join("missing.json")),
            Err(RelayError::Io(_))
        ));
    }
}

//! Event watch configuration
//!
//! Decides which DOM events the front-end observes, how mouse positions are
//! reported and how delivery is rate limited. Every change is validated before
//! it is stored.

pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use config::EventWatchConfig;
pub use error::{WatchError, WatchResult};
pub use settings::{load_settings, save_settings, WatchSettings};
pub use types::{CoordinateSystem, EventKind, RateLimitMethod};

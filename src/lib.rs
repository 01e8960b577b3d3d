//! DOM Event Relay - browser events, delivered to host callbacks.
//!
//! This is the main library crate. It provides the validated watch
//! configuration, the callback registry, and the relay that feeds front-end
//! messages to them.

pub mod dispatch;
pub mod error;
pub mod payload;
pub mod relay;
pub mod watch;

pub use dispatch::{Callback, DispatchRegistry};
pub use error::{RelayError, RelayResult};
pub use payload::EventPayload;
pub use relay::{EventWatcher, InboundMessage};
pub use watch::{EventWatchConfig, WatchError, WatchSettings};

use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging. Output goes to stderr so stdout stays free for
/// relayed events. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dom_event_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Run the relay: apply the settings file (if any), then print every DOM
/// event read from stdin as one JSON line on stdout.
pub async fn run(settings_path: Option<PathBuf>) -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting DOM Event Relay v{}", env!("CARGO_PKG_VERSION"));

    let settings = match settings_path {
        Some(path) => watch::load_settings(&path)?,
        None => WatchSettings::default(),
    };
    let config = EventWatchConfig::from_settings(&settings)?;
    tracing::info!(
        "Watching {:?} (xy={:?}, wait={}ms, method={:?})",
        config.watched_events(),
        config.xy_coordinate_system(),
        config.wait(),
        config.throttle_or_debounce()
    );

    let watcher = Arc::new(Mutex::new(EventWatcher::with_config(config)));
    watcher.lock().on_dom_event(
        Callback::new(|payload: &EventPayload| {
            let line = serde_json::to_string(payload)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", line)?;
            Ok(())
        }),
        false,
    );

    let source = relay::JsonLinesSource::new(BufReader::new(tokio::io::stdin()));
    let handled = relay::pump(Arc::clone(&watcher), source).await?;

    if let Some((x, y)) = watcher.lock().xy() {
        tracing::info!("Last reported position: ({}, {})", x, y);
    }
    tracing::info!("Relayed {} message(s)", handled);
    Ok(())
}

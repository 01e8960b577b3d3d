use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    dom_event_relay::run(settings_path).await
}

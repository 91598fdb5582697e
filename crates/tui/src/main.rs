mod app;
mod theme;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Arc,
};

use gameday_core::{
    config::{self, AppConfig},
    export::TeamSheetLayout,
    Exporter, FileStore, Store,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let created = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir)?;
    if created {
        tracing::info!(
            path = %config::config_path().display(),
            "Default configuration written"
        );
    }

    let store = Store::open(FileStore::new(&config.data_dir));
    let layout = if config.preview_layout {
        TeamSheetLayout::Preview
    } else {
        TeamSheetLayout::Listing
    };
    let exporter = Exporter::new(&config.export_dir).with_layout(layout);

    tracing::info!(
        data_dir = %config.data_dir.display(),
        export_dir = %config.export_dir.display(),
        "Starting tracker"
    );
    app::TrackerApp::new(store, exporter).run().await
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("gameday.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the terminal UI
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

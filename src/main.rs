//! Ch3rry Pi3 entry point.
//!
//! `serve` runs the Twin API; `export` writes the static front-end bundle.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ch3rry_pi3::config::{AppConfig, Command};
use ch3rry_pi3::export::export;
use ch3rry_pi3::server::start_server;
use ch3rry_pi3::ui::Site;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let (config, command) = AppConfig::load().context("failed to load configuration")?;
    let config = Arc::new(config);

    match command {
        Command::Serve => start_server(config).await,
        Command::Export { .. } => {
            let site = Site::twin(&config.export.api_url);
            let report = export(&config.export, &site)?;
            for file in &report.files {
                info!(name: "export.file", file = %file.display(), "Wrote file");
            }
            Ok(())
        }
    }
}

//! # Pawmarket Messaging Service
//!
//! Application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - HTTP server with live message delivery

use anyhow::Result;
use tracing::info;

use pawmarket::config::Settings;
use pawmarket::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    pawmarket::telemetry::init_tracing();

    info!("Starting messaging service...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}

use anyhow::Result;
use gp_translate_update_api::{
    api,
    config::{Config, RegistrySource},
    db::GlotPressDb,
    registry::{FreshnessProvider, ProjectRegistry, StaticRegistry},
    UpdateCheckService,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gp_translate_update_api=info".parse()?),
        )
        .init();

    info!("Starting translation update-check API");

    // Load configuration from environment
    let config = Config::from_env()?;

    if config.api_key.is_some() {
        info!("API key configured (update checks are not authenticated)");
    }

    let (projects, freshness): (Arc<dyn ProjectRegistry>, Arc<dyn FreshnessProvider>) =
        match &config.registry {
            RegistrySource::Database { url, table_prefix } => {
                let db = Arc::new(GlotPressDb::connect(url, table_prefix).await?);
                (db.clone() as Arc<dyn ProjectRegistry>, db as Arc<dyn FreshnessProvider>)
            }
            RegistrySource::File(path) => {
                let registry = Arc::new(StaticRegistry::from_file(path)?);
                info!(
                    "✓ Loaded {} project(s) from {}",
                    registry.project_count(),
                    path.display()
                );
                (registry.clone() as Arc<dyn ProjectRegistry>, registry as Arc<dyn FreshnessProvider>)
            }
        };

    let locales = config.locale_registry()?;
    info!("Serving {} locale(s)", locales.len());

    let service = UpdateCheckService::new(projects, freshness, locales, config.projects_url())
        .with_language_style(config.language_style);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    api::serve(listener, Arc::new(service), shutdown_signal()).await?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

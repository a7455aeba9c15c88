use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voice_currency_converter::{
    api::start_server, config::Settings, orchestrator::ConversionOrchestrator,
    rates::HttpRateProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;

    info!("🎧 VoiceCurrency - API Server");
    info!("📍 Port: {}", settings.api_port);
    info!("💱 Rate service: {}", settings.rates_api.base_url);

    let provider = HttpRateProvider::new(settings.rates_api.clone())?;
    let orchestrator = Arc::new(ConversionOrchestrator::new(Arc::new(provider)));

    info!("✅ Orchestrator initialized");
    info!("📡 Starting API server...");

    start_server(orchestrator, settings.api_port).await?;

    Ok(())
}

use clap::Parser;
use formgen::adapters::api_handler::ApiState;
use formgen::adapters::form_store::FormStore;
use formgen::adapters::generation_client::{GeminiClient, GenerationClient};
use formgen::adapters::health_handler::HealthHandler;
use formgen::cli::Cli;
use formgen::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Formgen server on {}:{}", host, port);

    let client: Arc<dyn GenerationClient> = Arc::new(GeminiClient::new(&settings.generation)?);
    let store = FormStore::new();
    let health_handler = Arc::new(HealthHandler::new(Arc::new(settings)));

    let app = formgen::create_app(ApiState { store, client }, health_handler);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

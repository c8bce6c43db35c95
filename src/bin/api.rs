use finassist::{
    advisor::Advisor,
    api::start_server,
    provider::GeminiClient,
    store::{MemStorage, Storage},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  GEMINI_API_KEY not set in .env");
        eprintln!("📌 Chat will answer with the fallback message until it is configured");
        String::new()
    });

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("🚀 FinAssist - API Server");
    info!("📍 Port: {}", api_port);

    // Create components
    let storage = MemStorage::new();
    storage.seed_demo_data().await?;
    let storage: Arc<dyn Storage> = Arc::new(storage);

    let provider = Arc::new(GeminiClient::new(gemini_api_key));
    let advisor = Arc::new(Advisor::new(storage.clone(), provider));

    info!("✅ Store seeded with demo data");
    info!("📡 Starting API server...");

    // Start API server
    start_server(storage, advisor, api_port).await?;

    Ok(())
}

use finassist::{
    advisor::Advisor,
    provider::{CompletionProvider, GeminiClient, OfflineProvider},
    store::{MemStorage, Storage},
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keep request noise out of the REPL; advisor warnings still surface
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Create components
    let storage = MemStorage::new();
    storage.seed_demo_data().await?;
    let storage: Arc<dyn Storage> = Arc::new(storage);

    let provider: Arc<dyn CompletionProvider> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => Arc::new(GeminiClient::new(key)),
        _ => {
            println!("GEMINI_API_KEY not set - using canned offline answers");
            Arc::new(OfflineProvider)
        }
    };

    let advisor = Advisor::new(storage, provider);

    println!("FinAssist terminal chat (demo user: Alex Morgan). Empty line exits.");

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            break;
        }

        let reply = advisor.respond(message, 1).await;
        println!("assistant> {}\n", reply);
    }

    Ok(())
}

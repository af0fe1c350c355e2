use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod audio;
mod config;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use tts::{GeminiClient, SpeechService};

#[tokio::main]
async fn main() {
    // Pick up a local .env before reading any configuration
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let addr = config.addr;

    tracing::info!("TTS Playground Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Static directory: {}", config.static_dir.display());
    tracing::info!("Provider endpoint: {}", config.gemini.base_url);

    // The provider client is built once and shared by every request
    let provider = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        speech: SpeechService::new(Arc::new(provider)),
    });

    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use prestige::api::{AppState, create_router};
use prestige::config::Config;

#[derive(Parser, Debug)]
#[command(about = "Search-visibility summaries and lead capture for the Prestige site")]
struct Args {
    /// Address to listen on (overrides BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// Directory of static site files (overrides STATIC_DIR)
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_dir = static_dir;
    }
    if config.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; summaries will fail");
    }

    let config = Arc::new(config);
    let client = config.http_client()?;
    let router = create_router(AppState::new(config.clone(), client), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}

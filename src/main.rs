use clap::Parser;
use tracing_subscriber::EnvFilter;

use timeline_api_rust::config::AppConfig;
use timeline_api_rust::database::DatabaseManager;
use timeline_api_rust::server::{app, AppState};

#[derive(Parser)]
#[command(name = "timeline-api-rust")]
#[command(about = "Timeline API server")]
#[command(version)]
struct Args {
    #[arg(long, env = "PORT", help = "Port to listen on (overrides the environment preset)")]
    port: Option<u16>,

    #[arg(long, help = "Public origin used in Link headers, e.g. https://social.example")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let mut config: AppConfig = timeline_api_rust::config::config().clone();
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(base_url) = args.base_url {
        config.http.base_url = base_url.trim_end_matches('/').to_string();
    }
    tracing::info!("Starting Timeline API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; protected timelines will reject every request");
    }

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let bind_addr = format!("0.0.0.0:{}", config.http.port);
    let public_url = config.http.base_url.clone();
    let app = app(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Timeline API listening on http://{} (links rooted at {})", bind_addr, public_url);

    axum::serve(listener, app).await?;
    Ok(())
}

use tracing_subscriber::{EnvFilter, fmt};
use weather_core::ProxyConfig;
use weather_server::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; real environment variables win.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON lines for log shippers, human-readable otherwise
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => fmt().json().with_env_filter(filter).init(),
        _ => fmt().with_env_filter(filter).init(),
    }

    let config = ProxyConfig::from_env()?;
    tracing::info!(?config, "Starting weather proxy");

    server::start(config).await
}

use std::time::Duration;

use anyhow::Context;
use axum::{Extension, Router, middleware};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use weather_core::{ProxyConfig, WeatherProxy};

use crate::cors::{self, AllowedOrigins};
use crate::routes;

/// Headroom on top of the upstream timeout before the whole request is cut off.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Builds the full application router around `proxy`.
pub fn router(proxy: WeatherProxy, config: &ProxyConfig) -> Router {
    let origins = AllowedOrigins::new(config.allowed_origins.iter().cloned());

    routes::handler()
        .layer(middleware::from_fn_with_state(origins.clone(), cors::apply))
        .layer(Extension(origins))
        .layer(Extension(proxy))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.upstream_timeout + REQUEST_TIMEOUT_SLACK))
}

/// Starts the server with the given configuration
///
/// # Errors
///
/// Returns an error if the upstream client cannot be built or the server
/// fails to bind to the port
pub async fn start(config: ProxyConfig) -> anyhow::Result<()> {
    let proxy =
        WeatherProxy::from_config(&config).context("Failed to set up the upstream client")?;

    let router = router(proxy, &config);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("🔄 Weather proxy started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;

    tracing::info!("✅ Weather proxy shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down weather proxy...");
}

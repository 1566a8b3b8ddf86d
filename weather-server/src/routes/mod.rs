mod health;
mod weather;

use axum::{Router, routing::get};

/// Creates the router with all handler routes
pub fn handler() -> Router {
    Router::new()
        .route("/health", get(health::handler))
        .route("/weather", get(weather::handler).options(weather::preflight))
}

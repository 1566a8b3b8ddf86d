//! Mapping of proxy failures onto HTTP responses

use std::error::Error;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use weather_core::ProxyError;

/// Application error returned by handlers.
///
/// The body is always `{"message": ...}`; upstream details never leave the
/// process.
#[derive(Debug)]
pub struct AppError(ProxyError);

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", status, self.0.message()),
            500..=599 => tracing::error!("Server error: {} - {}", status, error_chain(&self.0)),
            _ => {}
        }

        (status, Json(self.0.to_api_error())).into_response()
    }
}

/// `outer: inner: ...` down the `source()` chain.
fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

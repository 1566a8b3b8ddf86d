//! Cross-origin access for browser clients.
//!
//! Only origins on the configured allow-list are ever echoed back; every
//! other origin gets a response without permissive CORS headers.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};

pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE_SECS: &str = "86400";

/// Exact-match set of allowed origins.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Arc<HashSet<String>>);

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Arc::new(origins.into_iter().map(Into::into).collect()))
    }

    /// The request's `Origin` if it is on the list.
    #[must_use]
    pub fn matching(&self, headers: &HeaderMap) -> Option<HeaderValue> {
        let origin = headers.get(header::ORIGIN)?;
        let allowed = origin.to_str().ok().is_some_and(|o| self.0.contains(o));
        allowed.then(|| origin.clone())
    }
}

/// Adds `Access-Control-Allow-Origin` to responses for allowed origins.
///
/// Any request carrying `Origin` gets `Vary: origin`, allowed or not, so a
/// shared cache keeps the two variants apart.
pub async fn apply(State(origins): State<AllowedOrigins>, request: Request, next: Next) -> Response {
    let has_origin = request.headers().contains_key(header::ORIGIN);
    let origin = origins.matching(request.headers());
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    if has_origin {
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }

    response
}

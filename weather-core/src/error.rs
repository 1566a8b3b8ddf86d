use std::time::Duration;

use thiserror::Error;

use crate::model::ApiError;

pub const MISSING_CITY_MESSAGE: &str = "City parameter is required";
pub const NOT_FOUND_MESSAGE: &str = "City not found";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Error, Please try again";

/// Outcome of a failed proxy lookup, as seen by the caller.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{}", MISSING_CITY_MESSAGE)]
    MissingInput,

    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// The detail stays server-side; callers only see the generic message.
    #[error("upstream weather request failed")]
    UpstreamFailure(#[source] UpstreamError),
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingInput => 400,
            ProxyError::NotFound => 404,
            ProxyError::UpstreamFailure(_) => 500,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ProxyError::MissingInput => MISSING_CITY_MESSAGE,
            ProxyError::NotFound => NOT_FOUND_MESSAGE,
            ProxyError::UpstreamFailure(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        ApiError { message: self.message().to_string(), status_code: self.status_code() }
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        ProxyError::UpstreamFailure(err)
    }
}

/// What went wrong talking to the upstream provider. Operator-facing only.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build upstream HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to reach upstream")]
    Transport(#[source] reqwest::Error),

    #[error("upstream responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream returned malformed JSON")]
    Malformed(#[source] serde_json::Error),
}

/// Failure of the client-side call to the proxy.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The proxy answered with a non-2xx status.
    #[error("proxy rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("failed to reach the weather proxy")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to decode the proxy response")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_and_messages() {
        let upstream = ProxyError::from(UpstreamError::Status { status: 503, body: "x".into() });

        let cases = [
            (ProxyError::MissingInput, 400, "City parameter is required"),
            (ProxyError::NotFound, 404, "City not found"),
            (upstream, 500, "Error, Please try again"),
        ];

        for (err, status, message) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.message(), message);

            let api = err.to_api_error();
            assert_eq!(api.status_code, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn upstream_detail_is_kept_as_source_only() {
        let err = ProxyError::from(UpstreamError::Status {
            status: 401,
            body: "Invalid API key".into(),
        });

        assert!(!err.to_api_error().message.contains("Invalid API key"));

        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(source.contains("401"));
        assert!(source.contains("Invalid API key"));
    }
}

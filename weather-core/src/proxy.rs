use std::sync::Arc;

use crate::{
    config::ProxyConfig,
    error::{ProxyError, UpstreamError},
    model::{WeatherQuery, WeatherResult},
    provider::{OpenWeatherProvider, UpstreamReply, WeatherProvider},
};

/// Validates city lookups, forwards them upstream and maps the outcome onto
/// the small error vocabulary exposed to callers.
///
/// Stateless: one instance can serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct WeatherProxy {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherProxy {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Proxy backed by OpenWeather, configured from `config`.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        let provider = OpenWeatherProvider::new(config)?;
        Ok(Self::new(Arc::new(provider)))
    }

    /// Look up the current weather for the raw `city` parameter.
    ///
    /// A missing or blank city fails with [`ProxyError::MissingInput`]
    /// without touching the upstream.
    pub async fn get_weather(&self, city: Option<&str>) -> Result<WeatherResult, ProxyError> {
        let query = WeatherQuery::parse(city)?;

        match self.provider.current_by_city(query.city()).await {
            Ok(UpstreamReply::Found(result)) => Ok(result),
            Ok(UpstreamReply::NotFound) => {
                tracing::info!(city = query.city(), "city not found upstream");
                Err(ProxyError::NotFound)
            }
            Err(err) => {
                tracing::error!(city = query.city(), error = ?err, "weather upstream failure");
                Err(ProxyError::UpstreamFailure(err))
            }
        }
    }
}

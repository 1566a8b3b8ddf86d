use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::ClientConfig, error::FetchError, model::WeatherResult};

/// Client side of the `GET /weather` call.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`WeatherApi`] talking HTTP to a running proxy.
#[derive(Debug, Clone)]
pub struct HttpWeatherApi {
    base_url: String,
    http: Client,
}

impl HttpWeatherApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(Box::new(e)))?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::new(&config.proxy_url, config.timeout())
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, FetchError> {
        let res = self
            .http
            .get(format!("{}/weather", self.base_url))
            .query(&[("city", city)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(Box::new(e)))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Transport(Box::new(e)))?;

        if status.is_success() {
            return WeatherResult::from_json(body).map_err(|e| FetchError::Decode(Box::new(e)));
        }

        let parsed: ErrorBody =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(Box::new(e)))?;

        Err(FetchError::Rejected { status: status.as_u16(), message: parsed.message })
    }
}

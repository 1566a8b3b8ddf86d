use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::ProxyConfig,
    error::UpstreamError,
    model::{WeatherResult, WeatherSummary},
};

use super::{UpstreamReply, WeatherProvider};

/// Current-weather lookups against the OpenWeather API, imperial units.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    url: String,
    timeout: Duration,
    http: Client,
}

// The API key must never end up in logs.
impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| UpstreamError::Client(e.without_url()))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            url: config.upstream_url.clone(),
            timeout: config.upstream_timeout,
            http,
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<UpstreamReply, UpstreamError> {
        tracing::debug!(city, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&self.url)
            .query(&[("q", city), ("units", "imperial"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.classify(e))?;

        match status {
            StatusCode::OK => {
                let result = WeatherResult::from_json(body).map_err(UpstreamError::Malformed)?;
                Ok(UpstreamReply::Found(result))
            }
            StatusCode::NOT_FOUND => Ok(UpstreamReply::NotFound),
            other => Err(UpstreamError::Status {
                status: other.as_u16(),
                body: truncate_body(&body),
            }),
        }
    }

    /// The request URL carries `appid`, so it is stripped from the error.
    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Transport(err.without_url())
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_by_city(&self, city: &str) -> Result<UpstreamReply, UpstreamError> {
        self.fetch_current(city).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

/// Parse the fields a client displays out of a current-weather payload.
pub(crate) fn summarize(body: &str) -> Result<WeatherSummary> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let (condition, description) = parsed
        .weather
        .first()
        .map(|w| (w.main.clone(), w.description.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

    Ok(WeatherSummary {
        location_name: parsed.name,
        country: parsed.sys.country,
        temperature_f: parsed.main.temp,
        feels_like_f: parsed.main.feels_like,
        temp_min_f: parsed.main.temp_min,
        temp_max_f: parsed.main.temp_max,
        humidity_pct: parsed.main.humidity,
        wind_speed_mph: parsed.wind.speed,
        wind_deg: parsed.wind.deg,
        condition,
        description,
        observation_time: parsed.dt.and_then(unix_to_utc),
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::ProxyError;

/// A validated lookup request: the city is present and not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    /// Validate the raw `city` parameter.
    pub fn parse(city: Option<&str>) -> Result<Self, ProxyError> {
        match city.map(str::trim) {
            Some(city) if !city.is_empty() => Ok(Self { city: city.to_string() }),
            _ => Err(ProxyError::MissingInput),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Upstream weather payload, relayed byte-for-byte.
///
/// The JSON text is validated on construction but never re-encoded, so key
/// order and number formatting survive the trip through the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherResult(Box<RawValue>);

impl WeatherResult {
    pub fn from_json(body: String) -> Result<Self, serde_json::Error> {
        RawValue::from_string(body).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }

    pub fn to_value(&self) -> serde_json::Value {
        // already validated, cannot fail
        serde_json::from_str(self.as_str()).unwrap_or(serde_json::Value::Null)
    }

    /// Typed view of the fields a client displays.
    pub fn summary(&self) -> anyhow::Result<WeatherSummary> {
        crate::provider::openweather::summarize(self.as_str())
    }
}

impl PartialEq for WeatherResult {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for WeatherResult {}

/// Error body returned to callers of the proxy.
///
/// Only `message` goes over the wire; the status code travels as the HTTP
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip, default = "ApiError::default_status")]
    pub status_code: u16,
}

impl ApiError {
    fn default_status() -> u16 {
        500
    }
}

/// Coarse weather condition, used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Other,
}

impl Condition {
    pub fn from_main(main: &str) -> Self {
        match main.to_lowercase().as_str() {
            "clear" => Condition::Clear,
            "clouds" => Condition::Clouds,
            "rain" => Condition::Rain,
            _ => Condition::Other,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Condition::Clear => "☀",
            Condition::Rain => "🌧",
            Condition::Clouds | Condition::Other => "☁",
        }
    }
}

/// Current conditions for one location, in imperial units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub location_name: String,
    pub country: Option<String>,
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub temp_min_f: f64,
    pub temp_max_f: f64,
    pub humidity_pct: u8,
    pub wind_speed_mph: f64,
    pub wind_deg: Option<u16>,
    pub condition: String,
    pub description: String,
    pub observation_time: Option<DateTime<Utc>>,
}

impl WeatherSummary {
    pub fn condition_kind(&self) -> Condition {
        Condition::from_main(&self.condition)
    }
}

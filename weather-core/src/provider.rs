use crate::{error::UpstreamError, model::WeatherResult};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Answer of the upstream for a city lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamReply {
    Found(WeatherResult),
    /// The upstream does not know the city.
    NotFound,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for `city`. Exactly one outbound request per call.
    async fn current_by_city(&self, city: &str) -> Result<UpstreamReply, UpstreamError>;
}

//! Core library of the weather proxy.
//!
//! This crate defines:
//! - Process configuration (proxy) and on-disk settings (client)
//! - The upstream provider abstraction and its OpenWeather implementation
//! - The proxy service mapping upstream outcomes onto a small error vocabulary
//! - The client-side fetcher with its recent-searches list
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod proxy;

pub use client::{FetchState, Phase, WeatherFetcher};
pub use config::{ClientConfig, ProxyConfig};
pub use error::{FetchError, ProxyError, UpstreamError};
pub use model::{ApiError, Condition, WeatherQuery, WeatherResult, WeatherSummary};
pub use provider::{UpstreamReply, WeatherProvider};
pub use proxy::WeatherProxy;

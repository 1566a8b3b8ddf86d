use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use tokio::task::JoinHandle;
use weather_core::{
    ClientConfig, FetchState, WeatherFetcher,
    client::{FileStore, HttpWeatherApi},
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Proxy base URL; overrides the configured one for this run.
    #[arg(long, global = true)]
    pub proxy_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the proxy URL and request timeout.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },

    /// Pick one of the recent searches and look it up again.
    Recent {
        /// Only print the list.
        #[arg(long)]
        list: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = ClientConfig::load()?;
        if let Some(url) = self.proxy_url {
            config.proxy_url = url;
        }

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city } => {
                let mut fetcher = fetcher(&config)?;
                let progress = report_progress(&fetcher);
                fetcher.search(&city).await;
                progress.abort();

                render(&fetcher.state())
            }
            Command::Recent { list } => {
                let mut fetcher = fetcher(&config)?;
                if fetcher.recent().is_empty() {
                    println!("No recent searches yet.");
                    return Ok(());
                }

                if list {
                    for (i, city) in fetcher.recent().iter().enumerate() {
                        println!("{}. {city}", i + 1);
                    }
                    return Ok(());
                }

                let choice =
                    Select::new("Recent searches:", fetcher.recent().to_vec()).raw_prompt()?;

                let progress = report_progress(&fetcher);
                fetcher.select_recent(choice.index).await;
                progress.abort();

                render(&fetcher.state())
            }
        }
    }
}

fn configure(current: ClientConfig) -> anyhow::Result<()> {
    let proxy_url = Text::new("Proxy URL:")
        .with_default(&current.proxy_url)
        .with_help_message("Base URL of a running weather-server")
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(current.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    let config = ClientConfig { proxy_url: proxy_url.trim().to_string(), timeout_secs };
    config.save()?;

    println!("Saved configuration to {}", ClientConfig::config_file_path()?.display());
    Ok(())
}

fn fetcher(config: &ClientConfig) -> anyhow::Result<WeatherFetcher> {
    let api = HttpWeatherApi::from_config(config).context("Failed to set up HTTP client")?;
    let store = FileStore::new(ClientConfig::state_file_path()?);
    Ok(WeatherFetcher::new(Arc::new(api), Arc::new(store)))
}

/// Print a note to stderr whenever a lookup goes in flight.
fn report_progress(fetcher: &WeatherFetcher) -> JoinHandle<()> {
    let mut rx = fetcher.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if rx.borrow_and_update().loading {
                eprintln!("Fetching weather...");
            }
        }
    })
}

fn render(state: &FetchState) -> anyhow::Result<()> {
    if let Some(message) = &state.error {
        return Err(anyhow!("{message}"));
    }

    let Some(weather) = &state.weather else {
        return Ok(());
    };

    match weather.summary() {
        Ok(summary) => print!("{}", output::format_summary(&summary)),
        Err(err) => {
            tracing::debug!(error = ?err, "payload has an unexpected shape, printing raw JSON");
            println!("{:#}", weather.to_value());
        }
    }

    Ok(())
}

//! Client side of the weather lookup: calls the proxy, tracks the state of the
//! current lookup and remembers recently searched cities.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{error::FetchError, model::WeatherResult};

pub mod api;
pub mod recent;
pub mod store;

pub use api::{HttpWeatherApi, WeatherApi};
pub use recent::RecentSearches;
pub use store::{FileStore, KeyValueStore, MemoryStore};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a city name";
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching weather data";
pub const FALLBACK_ERROR_MESSAGE: &str = "City not found";

/// What a UI needs to render the current lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    pub loading: bool,
    pub weather: Option<WeatherResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.weather.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }
}

/// Drives city lookups against the proxy.
///
/// There is no cancellation and no ordering guard: whichever lookup finishes
/// last decides the state.
#[derive(Debug)]
pub struct WeatherFetcher {
    api: Arc<dyn WeatherApi>,
    store: Arc<dyn KeyValueStore>,
    recent: RecentSearches,
    state: watch::Sender<FetchState>,
}

impl WeatherFetcher {
    pub fn new(api: Arc<dyn WeatherApi>, store: Arc<dyn KeyValueStore>) -> Self {
        let recent = RecentSearches::load(store.as_ref());
        let (state, _) = watch::channel(FetchState::default());
        Self { api, store, recent, state }
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Observe every state change, including the transition into loading.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn recent(&self) -> &[String] {
        self.recent.as_slice()
    }

    /// The user edited the input; any shown error goes away.
    pub fn input_changed(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Submit `city`. Blank input is rejected locally.
    pub async fn search(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            self.state.send_modify(|s| s.error = Some(EMPTY_INPUT_MESSAGE.to_string()));
            return;
        }

        self.lookup(city).await;
    }

    /// Re-run the lookup for the recent search at `index`. Returns false if
    /// there is no such entry.
    pub async fn select_recent(&mut self, index: usize) -> bool {
        let Some(city) = self.recent.get(index).map(str::to_string) else {
            return false;
        };

        self.lookup(&city).await;
        true
    }

    async fn lookup(&mut self, city: &str) {
        self.state.send_modify(|s| s.loading = true);

        let outcome = self.api.fetch_weather(city).await;

        match outcome {
            Ok(weather) => {
                self.recent.push(city);
                if let Err(err) = self.recent.save(self.store.as_ref()) {
                    tracing::warn!(error = ?err, "failed to persist recent searches");
                }

                self.state.send_modify(|s| {
                    s.loading = false;
                    s.weather = Some(weather);
                    s.error = None;
                });
            }
            Err(err) => {
                let message = match err {
                    FetchError::Rejected { message, .. } => {
                        message.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
                    }
                    other => {
                        tracing::debug!(error = ?other, "weather lookup failed");
                        FETCH_FAILED_MESSAGE.to_string()
                    }
                };

                self.state.send_modify(|s| {
                    s.loading = false;
                    s.weather = None;
                    s.error = Some(message);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{collections::HashMap, sync::Mutex};

    #[derive(Debug, Default)]
    struct FakeApi {
        rejected: HashMap<String, Option<String>>,
        broken: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherApi for FakeApi {
        async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, FetchError> {
            self.calls.lock().unwrap().push(city.to_string());

            if self.broken {
                return Err(FetchError::Transport("connection refused".into()));
            }
            if let Some(message) = self.rejected.get(city) {
                return Err(FetchError::Rejected { status: 404, message: message.clone() });
            }

            Ok(WeatherResult::from_json(format!(r#"{{"name":"{city}"}}"#)).unwrap())
        }
    }

    fn fetcher(api: FakeApi) -> (WeatherFetcher, Arc<FakeApi>, Arc<MemoryStore>) {
        let api = Arc::new(api);
        let store = Arc::new(MemoryStore::new());
        (WeatherFetcher::new(api.clone(), store.clone()), api, store)
    }

    #[tokio::test]
    async fn blank_input_is_rejected_locally() {
        let (mut f, api, _) = fetcher(FakeApi::default());

        f.search("   ").await;

        let state = f.state();
        assert_eq!(state.error.as_deref(), Some("Please enter a city name"));
        assert_eq!(state.phase(), Phase::Error);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn success_stores_result_and_recent_search() {
        let (mut f, _, store) = fetcher(FakeApi::default());

        f.search("London").await;

        let state = f.state();
        assert_eq!(state.phase(), Phase::Success);
        assert_eq!(state.weather.unwrap().as_str(), r#"{"name":"London"}"#);
        assert_eq!(f.recent(), ["London"]);
        assert_eq!(store.get(recent::STORAGE_KEY).as_deref(), Some(r#"["London"]"#));
    }

    #[tokio::test]
    async fn six_searches_keep_five_newest() {
        let (mut f, _, store) = fetcher(FakeApi::default());

        for city in ["A", "B", "C", "D", "E", "F"] {
            f.search(city).await;
        }

        assert_eq!(f.recent(), ["F", "E", "D", "C", "B"]);
        assert_eq!(
            store.get(recent::STORAGE_KEY).as_deref(),
            Some(r#"["F","E","D","C","B"]"#)
        );
    }

    #[tokio::test]
    async fn repeated_search_moves_city_to_front() {
        let (mut f, _, _) = fetcher(FakeApi::default());

        f.search("A").await;
        f.search("B").await;
        f.search("A").await;

        assert_eq!(f.recent(), ["A", "B"]);
    }

    #[tokio::test]
    async fn rejection_shows_proxy_message_and_clears_result() {
        let api = FakeApi {
            rejected: HashMap::from([("Atlantis".to_string(), Some("City not found".into()))]),
            ..Default::default()
        };
        let (mut f, _, _) = fetcher(api);

        f.search("London").await;
        f.search("Atlantis").await;

        let state = f.state();
        assert_eq!(state.phase(), Phase::Error);
        assert!(state.weather.is_none());
        assert_eq!(state.error.as_deref(), Some("City not found"));
        assert_eq!(f.recent(), ["London"]);
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallback() {
        let api = FakeApi {
            rejected: HashMap::from([("Nowhere".to_string(), None)]),
            ..Default::default()
        };
        let (mut f, _, _) = fetcher(api);

        f.search("Nowhere").await;

        assert_eq!(f.state().error.as_deref(), Some(FALLBACK_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn transport_failure_shows_generic_message() {
        let (mut f, _, _) = fetcher(FakeApi { broken: true, ..Default::default() });

        f.search("London").await;

        let state = f.state();
        assert_eq!(state.error.as_deref(), Some("Error fetching weather data"));
        assert!(state.weather.is_none());
        assert!(f.recent().is_empty());
    }

    #[tokio::test]
    async fn selecting_recent_entry_reruns_lookup() {
        let (mut f, api, _) = fetcher(FakeApi::default());

        f.search("Oslo").await;
        f.search("Rome").await;

        assert!(f.select_recent(1).await);
        assert!(!f.select_recent(7).await);

        assert_eq!(api.calls(), ["Oslo", "Rome", "Oslo"]);
        assert_eq!(f.recent(), ["Oslo", "Rome"]);
    }

    #[tokio::test]
    async fn recent_searches_are_loaded_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(recent::STORAGE_KEY, r#"["Lima","Quito"]"#).unwrap();

        let f = WeatherFetcher::new(Arc::new(FakeApi::default()), store);

        assert_eq!(f.recent(), ["Lima", "Quito"]);
    }

    #[tokio::test]
    async fn input_change_clears_error() {
        let (mut f, _, _) = fetcher(FakeApi::default());

        f.search("").await;
        assert!(f.state().error.is_some());

        f.input_changed();
        assert_eq!(f.state().phase(), Phase::Idle);
    }

    #[derive(Debug, Default)]
    struct GatedApi {
        gate: tokio::sync::Notify,
    }

    #[async_trait]
    impl WeatherApi for GatedApi {
        async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, FetchError> {
            self.gate.notified().await;
            Ok(WeatherResult::from_json(format!(r#"{{"name":"{city}"}}"#)).unwrap())
        }
    }

    #[tokio::test]
    async fn observers_see_loading_while_in_flight() {
        let api = Arc::new(GatedApi::default());
        let mut f = WeatherFetcher::new(api.clone(), Arc::new(MemoryStore::new()));
        let mut rx = f.subscribe();

        let observe = async {
            rx.changed().await.unwrap();
            let seen = rx.borrow_and_update().phase();
            api.gate.notify_one();
            seen
        };

        let ((), seen) = tokio::join!(f.search("London"), observe);

        assert_eq!(seen, Phase::Loading);
        assert_eq!(f.state().phase(), Phase::Success);
    }
}

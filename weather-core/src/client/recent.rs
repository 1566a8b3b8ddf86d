use anyhow::{Context, Result};

use super::store::KeyValueStore;

pub const STORAGE_KEY: &str = "recentSearches";
pub const CAPACITY: usize = 5;

/// Previously searched cities, newest first, unique, at most [`CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSearches {
    cities: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the list from `store`; missing or unreadable data yields an empty list.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(STORAGE_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(cities) => {
                let mut recent = Self::default();
                // oldest first so the stored order is reproduced
                for city in cities.into_iter().rev() {
                    recent.push(city);
                }
                recent
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed recent searches");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.cities).context("Failed to encode recent searches")?;
        store.set(STORAGE_KEY, &json)
    }

    /// Move `city` to the front, dropping the oldest entry past capacity.
    pub fn push(&mut self, city: impl Into<String>) {
        let city = city.into();
        self.cities.retain(|c| *c != city);
        self.cities.insert(0, city);
        self.cities.truncate(CAPACITY);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::store::MemoryStore;

    #[test]
    fn keeps_five_newest_first() {
        let mut recent = RecentSearches::new();
        for city in ["A", "B", "C", "D", "E", "F"] {
            recent.push(city);
        }

        assert_eq!(recent.as_slice(), ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn repeated_city_moves_to_front() {
        let mut recent = RecentSearches::new();
        recent.push("A");
        recent.push("B");
        recent.push("A");

        assert_eq!(recent.as_slice(), ["A", "B"]);
    }

    #[test]
    fn dedup_is_exact_match() {
        let mut recent = RecentSearches::new();
        recent.push("london");
        recent.push("London");

        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        let mut recent = RecentSearches::new();
        recent.push("Paris");
        recent.push("Oslo");
        recent.save(&store).unwrap();

        assert_eq!(store.get(STORAGE_KEY).as_deref(), Some(r#"["Oslo","Paris"]"#));
        assert_eq!(RecentSearches::load(&store), recent);
    }

    #[test]
    fn load_normalizes_oversized_or_duplicated_data() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"["A","B","A","C","D","E","F","G"]"#).unwrap();

        let recent = RecentSearches::load(&store);
        assert_eq!(recent.as_slice(), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn load_ignores_malformed_data() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{oops").unwrap();

        assert!(RecentSearches::load(&store).is_empty());
    }
}

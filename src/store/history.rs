use crate::error::StoreError;
use crate::store::{KeyValueStore, HISTORY_KEY};

/// Persists generated image URLs, most recent first.
///
/// Unbounded: entries are never evicted or deduplicated.
#[derive(Debug, Clone)]
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Wraps a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the stored history. Missing or unparsable history reads as empty.
    pub fn get(&self) -> Vec<String> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read history: {e}");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed history: {e}");
            Vec::new()
        })
    }

    /// Inserts `url` at the front and persists the whole list.
    pub fn append(&self, url: impl Into<String>) -> Vec<String> {
        let mut entries = self.get();
        entries.insert(0, url.into());
        self.save(&entries);
        entries
    }

    /// Persists `entries` as the whole history, replacing what is stored.
    /// Write failures are logged and ignored.
    pub fn save(&self, entries: &[String]) {
        let result = serde_json::to_string(entries)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(HISTORY_KEY, &json));
        if let Err(e) = result {
            tracing::warn!("failed to persist history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults_to_empty() {
        let history = HistoryStore::new(MemoryStore::new());
        assert!(history.get().is_empty());
    }

    #[test]
    fn test_append_is_most_recent_first() {
        let history = HistoryStore::new(MemoryStore::new());
        for i in 1..=5 {
            let url = format!("https://example/img{i}.png");
            let entries = history.append(url.clone());
            assert_eq!(entries.len(), i);
            assert_eq!(entries[0], url);
        }
        assert_eq!(history.get()[4], "https://example/img1.png");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let history = HistoryStore::new(MemoryStore::new());
        history.append("https://example/same.png");
        history.append("https://example/same.png");
        assert_eq!(history.get().len(), 2);
    }

    #[test]
    fn test_persisted_as_json_array() {
        let backing = MemoryStore::new();
        let history = HistoryStore::new(backing.clone());
        history.append("a");
        history.append("b");
        assert_eq!(
            backing.get(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"["b","a"]"#)
        );
    }

    #[test]
    fn test_save_replaces_stored_list() {
        let backing = MemoryStore::new();
        let history = HistoryStore::new(backing.clone());
        history.append("stale");
        history.save(&["b".to_string(), "a".to_string()]);
        assert_eq!(history.get(), ["b", "a"]);
    }

    #[test]
    fn test_malformed_history_reads_empty() {
        let backing = MemoryStore::new();
        backing.set(HISTORY_KEY, "{oops").unwrap();
        let history = HistoryStore::new(backing);
        assert!(history.get().is_empty());
        assert_eq!(history.append("fresh"), vec!["fresh".to_string()]);
    }
}

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// The local in-process cache tier.
///
/// Entries expire after `ttl` and the map is bounded at `max_entries`;
/// overflowing inserts evict the oldest entries by insertion timestamp.
/// Eviction is insertion-order, not least-recently-used: a hit does not
/// refresh an entry's position.
pub struct LocalCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> LocalCache<V> {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Returns the cached value, honoring TTL. An expired entry is removed
    /// and reported absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() > self.ttl => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Inserts or refreshes a value, then trims the map to `max_entries` by
    /// dropping the oldest-inserted surplus entries.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key.into(),
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
        if entries.len() > self.max_entries {
            let surplus = entries.len() - self.max_entries;
            let mut by_age: Vec<(String, Instant)> = entries
                .iter()
                .map(|(k, e)| (k.clone(), e.inserted_at))
                .collect();
            by_age.sort_by_key(|(_, inserted_at)| *inserted_at);
            for (key, _) in by_age.into_iter().take(surplus) {
                entries.remove(&key);
            }
        }
    }

    pub fn delete(&self, key: &str) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .remove(key);
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

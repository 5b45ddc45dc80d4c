use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Time-bounded result cache. Entries expire `ttl` after insertion and are
/// evicted lazily on lookup.
///
/// The `*_at` variants take the current instant explicitly so expiry can be
/// exercised without sleeping.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<&V> {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|(stored, _)| now.saturating_duration_since(*stored) >= self.ttl);
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(_, value)| value)
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (now, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

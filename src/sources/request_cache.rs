use crate::types::date_range::DateRange;
use crate::types::location::LocationSpec;
use crate::types::trend_point::KeywordGroup;
use log::{debug, info};
use ordered_float::OrderedFloat;
use std::collections::{hash_map::Entry, HashMap};
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// In-memory read-through cache whose entries expire after a fixed TTL.
///
/// Only successful loads are stored. Every insert also evicts whatever has
/// expired, so the map holds at most the requests made within one TTL.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, stored_at: Instant) -> bool {
        stored_at.elapsed() < self.ttl
    }

    /// The cached value for `key`, if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let (stored_at, value) = entries.get(key)?;
        if self.is_fresh(*stored_at) {
            return Some(value.clone());
        }
        entries.remove(key);
        None
    }

    /// Returns the fresh cached value for `key`, or runs `load` and caches
    /// its result if it succeeds.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!("Request cache hit");
            return Ok(value);
        }

        // Load outside the lock so slow fetches don't block other keys.
        let loaded = load().await?;

        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        if entries.len() < before {
            debug!("Evicted {} expired request(s)", before - entries.len());
        }

        match entries.entry(key) {
            Entry::Occupied(entry) => {
                // Another caller filled it while we were loading.
                Ok(entry.get().1.clone())
            }
            Entry::Vacant(entry) => {
                entry.insert((Instant::now(), loaded.clone()));
                Ok(loaded)
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        info!("Clearing {} cached request(s)", entries.len());
        entries.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LocationKey {
    name: String,
    latitude: OrderedFloat<f64>,
    longitude: OrderedFloat<f64>,
}

/// Identity of one fetch request: every parameter that changes the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    groups: Vec<KeywordGroup>,
    range: DateRange,
    averaged: bool,
    locations: Vec<LocationKey>,
}

impl RequestKey {
    pub fn new(groups: &[KeywordGroup], range: DateRange, location: &LocationSpec) -> Self {
        Self {
            groups: groups.to_vec(),
            range,
            averaged: matches!(location, LocationSpec::Average(_)),
            locations: location
                .locations()
                .iter()
                .map(|l| LocationKey {
                    name: l.name.clone(),
                    latitude: OrderedFloat(l.coordinate.0),
                    longitude: OrderedFloat(l.coordinate.1),
                })
                .collect(),
        }
    }
}

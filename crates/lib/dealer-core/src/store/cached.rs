use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use dealer_store::Collection;
use serde_json::Value;
use tracing::debug;

use super::{RecordSource, StoreResult};

/// Snapshot cache in front of another record source.
///
/// `ttl == Some(Duration::ZERO)` disables caching, `None` keeps the first
/// successful snapshot for the lifetime of the process. Failed fetches are
/// never cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Option<Duration>,
    entries: RwLock<HashMap<Collection, CacheEntry>>,
}

/// Cached document and the instant it was fetched.
struct CacheEntry {
    document: Arc<Value>,
    loaded_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Option<Duration>, now: Instant) -> bool {
        ttl.is_none_or(|ttl| now.saturating_duration_since(self.loaded_at) < ttl)
    }
}

impl<S: RecordSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Option<Duration>) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Drops every cached snapshot, returning how many were held.
    pub fn invalidate(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let count = entries.len();
        entries.clear();
        count
    }

    fn caching_disabled(&self) -> bool {
        self.ttl.is_some_and(|ttl| ttl.is_zero())
    }
}

impl<S: RecordSource> RecordSource for CachedSource<S> {
    fn fetch(&self, collection: Collection) -> StoreResult<Arc<Value>> {
        if self.caching_disabled() {
            return self.inner.fetch(collection);
        }

        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&collection)
                && entry.is_fresh(self.ttl, now)
            {
                return Ok(entry.document.clone());
            }
        }

        let document = self.inner.fetch(collection)?;
        debug!(%collection, "refreshed cached collection");
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            collection,
            CacheEntry {
                document: document.clone(),
                loaded_at: Instant::now(),
            },
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySource, StoreError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        inner: MemorySource,
    }

    impl RecordSource for CountingSource {
        fn fetch(&self, collection: Collection) -> StoreResult<Arc<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(collection)
        }
    }

    fn counting(calls: Arc<AtomicUsize>) -> CountingSource {
        CountingSource {
            calls,
            inner: MemorySource::new().with_collection(Collection::Customers, json!([])),
        }
    }

    #[test]
    fn zero_ttl_reloads_every_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(counting(calls.clone()), Some(Duration::ZERO));
        assert_eq!(source.ttl(), Some(Duration::ZERO));
        source.fetch(Collection::Customers).unwrap();
        source.fetch(Collection::Customers).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unbounded_ttl_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(counting(calls.clone()), None);
        assert!(source.ttl().is_none());
        source.fetch(Collection::Customers).unwrap();
        source.fetch(Collection::Customers).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(source.invalidate(), 1);
        source.fetch(Collection::Customers).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(counting(calls.clone()), None);
        assert!(matches!(
            source.fetch(Collection::Visits),
            Err(StoreError::MissingCollection(Collection::Visits))
        ));
        assert!(source.fetch(Collection::Visits).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

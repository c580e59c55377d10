//! In-memory TTL caching for upstream responses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Cache behavior for one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read a non-expired entry if present, otherwise fetch and store.
    #[default]
    Use,
    /// Always fetch, overwrite the cached entry.
    Refresh,
    /// Always fetch, touch nothing.
    Bypass,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires_at: Instant,
}

/// Thread-safe TTL cache of cloneable values.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    inner: Arc<Mutex<HashMap<String, Entry<T>>>>,
    default_ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Cache with the default 5-minute response TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let map = self
            .inner
            .lock()
            .expect("cache map should not be poisoned");
        map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    pub fn put(&self, key: impl Into<String>, value: T) {
        if self.default_ttl == Duration::ZERO {
            return;
        }
        let mut map = self
            .inner
            .lock()
            .expect("cache map should not be poisoned");
        map.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + self.default_ttl,
            },
        );
    }

    /// Fetches through the cache according to `mode`.
    pub fn get_or_fetch<E>(
        &self,
        key: &str,
        mode: CacheMode,
        fetch: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if mode == CacheMode::Use {
            if let Some(value) = self.get(key) {
                return Ok(value);
            }
        }

        let value = fetch()?;
        if mode != CacheMode::Bypass {
            self.put(key, value.clone());
        }
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        let mut map = self
            .inner
            .lock()
            .expect("cache map should not be poisoned");
        map.remove(key);
    }

    pub fn clear(&self) {
        let mut map = self
            .inner
            .lock()
            .expect("cache map should not be poisoned");
        map.clear();
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("cache map should not be poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

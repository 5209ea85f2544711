//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

use super::retry::RetryPolicy;
use super::storage::{CacheEntry, CacheStorage};
use super::traits::{Cacheable, QueryKey};
use crate::error::{PokedexError, Result};

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between the application and the network client,
/// providing keyed caching with stale-while-revalidate semantics and
/// bounded retries.
pub struct CacheLayer {
  storage: Arc<dyn CacheStorage>,
  retry: RetryPolicy,
  /// Keys with a background refresh in flight
  revalidating: Arc<Mutex<HashSet<String>>>,
}

impl CacheLayer {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: impl CacheStorage + 'static) -> Self {
    Self {
      storage: Arc::new(storage),
      retry: RetryPolicy::default(),
      revalidating: Arc::new(Mutex::new(HashSet::new())),
    }
  }

  /// Set the retry policy applied to every fetch.
  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    self.retry
  }

  /// Read a cached value without fetching.
  ///
  /// Undecodable entries are treated as missing.
  pub fn peek<T: Cacheable>(&self, key: &impl QueryKey) -> Result<Option<(T, DateTime<Utc>)>> {
    Ok(self.read_entry::<T>(key)?.map(|(data, entry)| (data, entry.fetched_at)))
  }

  /// Store a value as freshly fetched.
  pub fn put<T: Cacheable>(&self, key: &impl QueryKey, data: &T, stale_time: Duration) -> Result<()> {
    store_value(self.storage.as_ref(), &key.cache_key(), data, stale_time)
  }

  /// Drop a cached value so the next fetch goes to the network.
  pub fn invalidate(&self, key: &impl QueryKey) -> Result<()> {
    tracing::debug!("Invalidating {}", key.description());
    self.storage.remove(&key.cache_key())
  }

  /// Fetch a value with stale-while-revalidate caching.
  ///
  /// 1. Fresh cache hit - return immediately
  /// 2. Stale cache hit - return the cached value immediately and refresh it
  ///    in the background
  /// 3. Miss - fetch from network (with retries) and store
  ///
  /// The fetcher receives the previously cached value when refreshing. A
  /// background refresh is discarded if the entry changed while it ran.
  pub async fn fetch<T, K, F, Fut>(
    &self,
    key: &K,
    stale_time: Duration,
    fetcher: F,
  ) -> Result<T>
  where
    T: Cacheable,
    K: QueryKey,
    F: Fn(Option<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    if let Some((cached, entry)) = self.read_entry::<T>(key)? {
      if !entry.is_stale(Utc::now()) {
        return Ok(cached);
      }

      self.spawn_revalidation(key, stale_time, entry.fetched_at, cached.clone(), fetcher);
      return Ok(cached);
    }

    tracing::debug!("Cache miss for {}", key.description());
    let data = self.retry.run(|| fetcher(None)).await?;
    self.put(key, &data, stale_time)?;
    Ok(data)
  }

  fn read_entry<T: Cacheable>(&self, key: &impl QueryKey) -> Result<Option<(T, CacheEntry)>> {
    let Some(entry) = self.storage.get(&key.cache_key())? else {
      return Ok(None);
    };

    match serde_json::from_value::<T>(entry.data.clone()) {
      Ok(data) => Ok(Some((data, entry))),
      Err(e) => {
        tracing::warn!(
          "Discarding undecodable {} entry for {}: {}",
          T::entity_type(),
          key.description(),
          e
        );
        Ok(None)
      }
    }
  }

  fn spawn_revalidation<T, K, F, Fut>(
    &self,
    key: &K,
    stale_time: Duration,
    started_from: DateTime<Utc>,
    previous: T,
    fetcher: F,
  ) where
    T: Cacheable,
    K: QueryKey,
    F: Fn(Option<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let cache_key = key.cache_key();
    {
      let mut in_flight = self.revalidating.lock().unwrap_or_else(|e| e.into_inner());
      if !in_flight.insert(cache_key.clone()) {
        return;
      }
    }

    let description = key.description();
    let storage = Arc::clone(&self.storage);
    let revalidating = Arc::clone(&self.revalidating);
    let retry = self.retry;

    tracing::debug!("Revalidating stale {}", description);
    tokio::spawn(async move {
      let result = retry.run(|| fetcher(Some(previous.clone()))).await;
      match result {
        Ok(data) => {
          match store_if_unchanged(storage.as_ref(), &cache_key, started_from, &data, stale_time) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Dropping refresh of {}: entry changed", description),
            Err(e) => tracing::warn!("Failed to store refreshed {}: {}", description, e),
          }
        }
        Err(e) => tracing::warn!("Background refresh of {} failed: {}", description, e),
      }
      revalidating
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .remove(&cache_key);
    });
  }
}

fn fresh_entry<T: Cacheable>(data: &T, stale_time: Duration) -> Result<CacheEntry> {
  let value = serde_json::to_value(data)
    .map_err(|e| PokedexError::Parse(format!("{} for caching: {}", T::entity_type(), e)))?;

  Ok(CacheEntry {
    data: value,
    fetched_at: Utc::now(),
    stale_time,
  })
}

fn store_value<T: Cacheable>(
  storage: &dyn CacheStorage,
  key: &str,
  data: &T,
  stale_time: Duration,
) -> Result<()> {
  storage.store(key, fresh_entry(data, stale_time)?)
}

fn store_if_unchanged<T: Cacheable>(
  storage: &dyn CacheStorage,
  key: &str,
  expected: DateTime<Utc>,
  data: &T,
  stale_time: Duration,
) -> Result<bool> {
  storage.store_if_unchanged(key, expected, fresh_entry(data, stale_time)?)
}

impl Clone for CacheLayer {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      retry: self.retry,
      revalidating: Arc::clone(&self.revalidating),
    }
  }
}

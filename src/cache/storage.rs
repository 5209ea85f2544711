//! Cache storage trait and in-memory implementation.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

/// A single cached value.
#[derive(Debug, Clone)]
pub struct CacheEntry {
  /// The cached value, serialized
  pub data: serde_json::Value,
  /// When the value was fetched
  pub fetched_at: DateTime<Utc>,
  /// How long the value stays fresh
  pub stale_time: Duration,
}

impl CacheEntry {
  pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
    is_stale(self.fetched_at, now, self.stale_time)
  }
}

/// Whether a value fetched at `fetched_at` is past its freshness window at `now`.
pub fn is_stale(fetched_at: DateTime<Utc>, now: DateTime<Utc>, stale_time: Duration) -> bool {
  now - fetched_at > stale_time
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Get the entry stored under a key.
  fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

  /// Store an entry, replacing any previous one.
  fn store(&self, key: &str, entry: CacheEntry) -> Result<()>;

  /// Drop an entry.
  fn remove(&self, key: &str) -> Result<()>;

  /// Store an entry only if the current one was fetched at `expected`.
  ///
  /// Returns `false` and leaves storage untouched when the entry was replaced
  /// or removed in the meantime.
  fn store_if_unchanged(
    &self,
    key: &str,
    expected: DateTime<Utc>,
    entry: CacheEntry,
  ) -> Result<bool> {
    match self.get(key)? {
      Some(current) if current.fetched_at == expected => {
        self.store(key, entry)?;
        Ok(true)
      }
      _ => Ok(false),
    }
  }
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn get(&self, _key: &str) -> Result<Option<CacheEntry>> {
    Ok(None) // Always miss
  }

  fn store(&self, _key: &str, _entry: CacheEntry) -> Result<()> {
    Ok(()) // Discard
  }

  fn remove(&self, _key: &str) -> Result<()> {
    Ok(())
  }
}

/// Process-wide in-memory cache. Entries live until the program exits.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
    // A panic while holding the lock cannot leave a half-written entry behind
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl CacheStorage for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
    Ok(self.entries().get(key).cloned())
  }

  fn store(&self, key: &str, entry: CacheEntry) -> Result<()> {
    self.entries().insert(key.to_string(), entry);
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self.entries().remove(key);
    Ok(())
  }

  fn store_if_unchanged(
    &self,
    key: &str,
    expected: DateTime<Utc>,
    entry: CacheEntry,
  ) -> Result<bool> {
    let mut entries = self.entries();
    match entries.get(key) {
      Some(current) if current.fetched_at == expected => {
        entries.insert(key.to_string(), entry);
        Ok(true)
      }
      _ => Ok(false),
    }
  }
}

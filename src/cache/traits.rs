//! Core traits and types for the caching system.

use serde::{de::DeserializeOwned, Serialize};

/// Trait for values that can be cached.
///
/// Values are stored as JSON, so anything serde can round-trip qualifies.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Entity type name used in log messages (e.g., "pokemon_detail")
  fn entity_type() -> &'static str;
}

/// Structured identity of a cached query.
pub trait QueryKey {
  /// Stable storage key (operation tag + parameters)
  fn cache_key(&self) -> String;

  /// Human-readable description for logging
  fn description(&self) -> String;
}

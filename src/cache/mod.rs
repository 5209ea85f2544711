//! Generic caching layer for remote data.
//!
//! This module provides a PokeAPI-agnostic caching mechanism that:
//! - Caches values under structured query keys with per-entry freshness windows
//! - Serves stale values immediately while refreshing them in the background
//! - Retries failed fetches with exponential backoff
//! - Accumulates pages for load-more lists

mod layer;
mod pages;
mod retry;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use pages::{InfinitePages, Page};
pub use retry::RetryPolicy;
pub use storage::{is_stale, CacheEntry, CacheStorage, MemoryStorage, NoopStorage};
pub use traits::{Cacheable, QueryKey};

//! Cached PokeAPI client that wraps PokeClient with transparent caching.

use chrono::Duration;
use futures::future::try_join_all;

use crate::cache::{CacheLayer, InfinitePages, MemoryStorage, NoopStorage, RetryPolicy};
use crate::config::Config;
use crate::error::{PokedexError, Result};

use super::cache::PokeQueryKey;
use super::client::PokeClient;
use super::types::{search_names, PokemonDetail, PokemonListItem, PokemonPage, PokemonPages};

/// Freshness windows and paging parameters for the cached client.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
  pub page_size: u32,
  pub list_stale: Duration,
  pub names_stale: Duration,
  pub detail_stale: Duration,
}

impl Default for CacheSettings {
  fn default() -> Self {
    Self {
      page_size: 24,
      list_stale: Duration::minutes(10),
      names_stale: Duration::minutes(30),
      detail_stale: Duration::minutes(10),
    }
  }
}

impl CacheSettings {
  pub fn from_config(config: &Config) -> Self {
    Self {
      page_size: config.list.page_size,
      list_stale: Duration::minutes(config.cache.list_stale_minutes),
      names_stale: Duration::minutes(config.cache.names_stale_minutes),
      detail_stale: Duration::minutes(config.cache.detail_stale_minutes),
    }
  }
}

/// PokeAPI client with transparent caching support.
///
/// This wraps the underlying PokeClient and exposes the read operations the
/// UI needs, with keyed caching, stale-while-revalidate and retries.
#[derive(Clone)]
pub struct CachedPokeClient {
  inner: PokeClient,
  cache: CacheLayer,
  settings: CacheSettings,
}

impl CachedPokeClient {
  /// Create a new cached client from configuration.
  pub fn new(config: &Config) -> Result<Self> {
    let inner = PokeClient::new(&config.api)?;
    let retry = RetryPolicy::default().with_retries(config.cache.retries);
    let cache = if config.cache.enabled {
      CacheLayer::new(MemoryStorage::new())
    } else {
      CacheLayer::new(NoopStorage)
    }
    .with_retry(retry);

    Ok(Self::with_parts(inner, cache, CacheSettings::from_config(config)))
  }

  pub fn with_parts(inner: PokeClient, cache: CacheLayer, settings: CacheSettings) -> Self {
    Self {
      inner,
      cache,
      settings,
    }
  }

  pub fn page_size(&self) -> u32 {
    self.settings.page_size
  }

  /// Get the loaded pages of the Pokémon list, loading the first page if needed.
  ///
  /// A stale list is returned as-is while every held page is re-fetched in
  /// the background.
  pub async fn list_pages(&self) -> Result<PokemonPages> {
    let inner = self.inner.clone();
    let page_size = self.settings.page_size;

    self
      .cache
      .fetch(
        &PokeQueryKey::PokemonList,
        self.settings.list_stale,
        move |previous: Option<PokemonPages>| {
          let inner = inner.clone();
          async move { refetch_pages(&inner, page_size, previous.as_ref()).await }
        },
      )
      .await
  }

  /// Re-fetch every page in `current` now, ignoring freshness.
  pub async fn refresh_list(&self, current: &PokemonPages) -> Result<PokemonPages> {
    let pages = self
      .cache
      .retry_policy()
      .run(|| refetch_pages(&self.inner, self.settings.page_size, Some(current)))
      .await?;

    self
      .cache
      .put(&PokeQueryKey::PokemonList, &pages, self.settings.list_stale)?;

    Ok(pages)
  }

  /// Load the page after `current` and return all loaded pages.
  ///
  /// The caller owns the loaded pages, so paging works with caching disabled.
  /// No request is issued once the list is exhausted.
  pub async fn fetch_next_page(&self, current: &PokemonPages) -> Result<PokemonPages> {
    let mut pages = current.clone();
    let Some(offset) = pages.next_offset() else {
      tracing::debug!("Pokémon list exhausted at {} items", pages.loaded());
      return Ok(pages);
    };

    let page = self
      .cache
      .retry_policy()
      .run(|| self.inner.fetch_page(self.settings.page_size, offset))
      .await?;
    pages.push(page);

    self
      .cache
      .put(&PokeQueryKey::PokemonList, &pages, self.settings.list_stale)?;

    Ok(pages)
  }

  /// Get up to one page of list items starting at `offset`, loading pages
  /// in order until the offset is covered or the list is exhausted.
  pub async fn list_page(&self, offset: u32) -> Result<PokemonPage> {
    let limit = self.settings.page_size;
    let mut pages = self.list_pages().await?;

    while pages.loaded() < offset.saturating_add(limit) && pages.has_next_page() {
      pages = self.fetch_next_page(&pages).await?;
    }

    Ok(PokemonPage {
      items: pages.slice(offset, limit),
      total: pages.total().unwrap_or(0),
    })
  }

  /// Get the full name index.
  pub async fn all_names(&self) -> Result<Vec<PokemonListItem>> {
    let inner = self.inner.clone();

    self
      .cache
      .fetch(
        &PokeQueryKey::AllNames,
        self.settings.names_stale,
        move |_previous| {
          let inner = inner.clone();
          async move { inner.fetch_all_names().await }
        },
      )
      .await
  }

  /// Search every Pokémon by name. A blank query returns nothing without
  /// touching the network.
  pub async fn search(&self, query: &str) -> Result<Vec<PokemonListItem>> {
    if query.trim().is_empty() {
      return Ok(Vec::new());
    }

    let names = self.all_names().await?;
    Ok(search_names(&names, query).into_iter().cloned().collect())
  }

  /// Get a single Pokémon, bypassing any cached copy.
  pub async fn refresh_detail(&self, id: u32) -> Result<PokemonDetail> {
    self.cache.invalidate(&PokeQueryKey::Detail { id })?;
    self.detail(id).await
  }

  /// Get a single Pokémon by id with caching.
  pub async fn detail(&self, id: u32) -> Result<PokemonDetail> {
    if id == 0 {
      return Err(PokedexError::InvalidId(id));
    }

    let inner = self.inner.clone();
    self
      .cache
      .fetch(
        &PokeQueryKey::Detail { id },
        self.settings.detail_stale,
        move |_previous| {
          let inner = inner.clone();
          async move { inner.fetch_detail(id).await }
        },
      )
      .await
  }
}

/// Fetch the pages at every offset held in `previous`, or the first page.
async fn refetch_pages(
  inner: &PokeClient,
  page_size: u32,
  previous: Option<&PokemonPages>,
) -> Result<PokemonPages> {
  let offsets = match previous {
    Some(pages) if !pages.is_empty() => pages.page_offsets(),
    _ => vec![0],
  };
  let pages = try_join_all(
    offsets
      .into_iter()
      .map(|offset| inner.fetch_page(page_size, offset)),
  )
  .await?;
  Ok(InfinitePages::from_pages(pages))
}

//! Accumulated pages for infinite (load-more) lists.

use serde::{Deserialize, Serialize};

/// One page of a paginated endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// Total number of items the endpoint reported
  pub total: u32,
}

/// Ordered sequence of loaded pages.
///
/// The next page starts where the loaded items end; the list is exhausted once
/// the loaded count reaches the total reported by the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfinitePages<T> {
  pages: Vec<Page<T>>,
}

impl<T> Default for InfinitePages<T> {
  fn default() -> Self {
    Self { pages: Vec::new() }
  }
}

impl<T> InfinitePages<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_pages(pages: Vec<Page<T>>) -> Self {
    Self { pages }
  }

  pub fn pages(&self) -> &[Page<T>] {
    &self.pages
  }

  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }

  pub fn push(&mut self, page: Page<T>) {
    self.pages.push(page);
  }

  /// Items across all pages, in load order.
  pub fn items(&self) -> impl Iterator<Item = &T> {
    self.pages.iter().flat_map(|p| p.items.iter())
  }

  /// Number of items loaded so far.
  pub fn loaded(&self) -> u32 {
    self.pages.iter().map(|p| p.items.len() as u32).sum()
  }

  /// Total reported by the most recent page.
  pub fn total(&self) -> Option<u32> {
    self.pages.last().map(|p| p.total)
  }

  /// Offset of the next page to request, or `None` when exhausted.
  pub fn next_offset(&self) -> Option<u32> {
    let Some(last) = self.pages.last() else {
      return Some(0);
    };

    // An empty page means the endpoint has nothing more, whatever the total says
    if last.items.is_empty() {
      return None;
    }

    let loaded = self.loaded();
    if loaded < last.total {
      Some(loaded)
    } else {
      None
    }
  }

  pub fn has_next_page(&self) -> bool {
    !self.pages.is_empty() && self.next_offset().is_some()
  }

  /// Start offset of every held page.
  pub fn page_offsets(&self) -> Vec<u32> {
    let mut offset = 0;
    self
      .pages
      .iter()
      .map(|p| {
        let start = offset;
        offset += p.items.len() as u32;
        start
      })
      .collect()
  }
}

impl<T: Clone> InfinitePages<T> {
  /// Up to `limit` loaded items starting at `offset`.
  pub fn slice(&self, offset: u32, limit: u32) -> Vec<T> {
    self
      .items()
      .skip(offset as usize)
      .take(limit as usize)
      .cloned()
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn page(start: u32, len: u32, total: u32) -> Page<u32> {
    Page {
      items: (start..start + len).collect(),
      total,
    }
  }

  #[test]
  fn test_empty_starts_at_zero() {
    let pages: InfinitePages<u32> = InfinitePages::new();
    assert_eq!(pages.next_offset(), Some(0));
    assert!(!pages.has_next_page());
  }

  #[test]
  fn test_next_offset_is_running_sum() {
    let mut pages = InfinitePages::new();
    pages.push(page(0, 24, 100));
    assert_eq!(pages.next_offset(), Some(24));
    pages.push(page(24, 24, 100));
    assert_eq!(pages.next_offset(), Some(48));
    assert_eq!(pages.page_offsets(), vec![0, 24]);
  }

  #[test]
  fn test_exhausted_after_all_pages() {
    let total = 1350;
    let mut pages = InfinitePages::new();
    let mut requests = 0;

    while let Some(offset) = pages.next_offset() {
      let len = 20.min(total - offset);
      pages.push(page(offset, len, total));
      requests += 1;
    }

    assert_eq!(requests, 68);
    assert_eq!(pages.loaded(), 1350);
    assert!(!pages.has_next_page());
  }

  #[test]
  fn test_empty_page_ends_pagination() {
    let mut pages = InfinitePages::new();
    pages.push(page(0, 10, 50));
    pages.push(page(10, 0, 50));
    assert_eq!(pages.next_offset(), None);
  }

  #[test]
  fn test_total_follows_last_page() {
    let mut pages = InfinitePages::new();
    pages.push(page(0, 10, 30));
    pages.push(page(10, 10, 20));
    assert_eq!(pages.total(), Some(20));
    assert!(!pages.has_next_page());
  }

  #[test]
  fn test_slice() {
    let mut pages = InfinitePages::new();
    pages.push(page(0, 5, 8));
    pages.push(page(5, 3, 8));
    assert_eq!(pages.slice(3, 4), vec![3, 4, 5, 6]);
    assert_eq!(pages.slice(6, 10), vec![6, 7]);
    assert!(pages.slice(20, 5).is_empty());
  }
}

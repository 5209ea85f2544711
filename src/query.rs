//! Async query abstraction for data fetching in views.
//!
//! A `Query<T>` owns the fetching closure, the loading/success/error state and
//! the channel the spawned fetch reports back on. Views poll it on every tick.
//!
//! # Example
//!
//! ```ignore
//! let client = pokedex_client.clone();
//! let mut query = Query::new(move || {
//!     let client = client.clone();
//!     async move { client.detail(25).await.map_err(|e| e.to_string()) }
//! });
//!
//! // Start fetching
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! match query.state() {
//!     QueryState::Loading => render_spinner(),
//!     QueryState::Success(data) => render_data(data),
//!     QueryState::Error(e) => render_error(e),
//!     QueryState::Idle => {}
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is fetching and has no data yet
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Async query for data fetching with state management.
///
/// Query<T> encapsulates:
/// - The fetching logic (via a closure)
/// - Loading/success/error states
/// - Async result handling via channels
///
/// Data from a previous success stays visible while a refetch is running
/// and after a refetch fails; `is_fetching()` reports the background
/// activity and `error()` the failed refetch.
pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
  enabled: bool,
  /// Error of the last refetch while data was already present
  refetch_error: Option<String>,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is a closure that returns a future. It will be called
  /// each time `fetch()` or `refetch()` is invoked.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
      enabled: true,
      refetch_error: None,
    }
  }

  /// Disable the query; a disabled query never starts a fetch.
  pub fn enabled(mut self, enabled: bool) -> Self {
    self.enabled = enabled;
    self
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// Check if the query is loading without any data to show.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Check if any fetch is in flight, including background refetches.
  pub fn is_fetching(&self) -> bool {
    self.receiver.is_some()
  }

  /// Check if the query succeeded.
  #[cfg(test)]
  pub fn is_success(&self) -> bool {
    self.state.is_success()
  }

  /// Check if the query, or its latest refetch, failed.
  pub fn is_error(&self) -> bool {
    self.state.is_error() || self.refetch_error.is_some()
  }

  /// Get the error message of the failed query or refetch.
  pub fn error(&self) -> Option<&str> {
    self.state.error().or(self.refetch_error.as_deref())
  }

  /// Start fetching data if not already fetching.
  pub fn fetch(&mut self) {
    if !self.enabled || self.is_fetching() {
      return;
    }
    self.start(None);
  }

  /// Force a refetch, discarding any pending result.
  pub fn refetch(&mut self) {
    if !self.enabled {
      return;
    }
    self.start(None);
  }

  /// Run a one-off future whose result replaces this query's data,
  /// e.g. loading the next page of a list. No-op while another fetch runs.
  pub fn fetch_with<Fut>(&mut self, future: Fut)
  where
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    if !self.enabled || self.is_fetching() {
      return;
    }
    self.start(Some(Box::pin(future)));
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    // Try to receive without blocking
    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.refetch_error = None;
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        if self.state.is_success() {
          self.refetch_error = Some(error);
        } else {
          self.state = QueryState::Error(error);
        }
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - treat as error
        self.state = QueryState::Error("Query was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }

  /// Internal: start the fetch operation.
  ///
  /// Replacing the receiver drops the previous one, so a superseded fetch
  /// finishes into a closed channel and its result is discarded.
  fn start(&mut self, future: Option<BoxFuture<T>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    if !self.state.is_success() {
      self.state = QueryState::Loading;
    }

    let future = future.unwrap_or_else(|| (self.fetcher)());
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
  }
}

// Query is not Clone because the fetcher is boxed and receiver is owned.

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("fetching", &self.receiver.is_some())
      .field("enabled", &self.enabled)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new(|| async { Ok::<_, String>(vec![1, 2, 3]) });

    assert!(matches!(query.state(), QueryState::Idle));

    query.fetch();
    assert!(query.is_loading());

    // Wait for the result
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert!(query.is_success());
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error() {
    let mut query: Query<i32> = Query::new(|| async { Err("Something went wrong".to_string()) });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert!(query.is_error());
    assert_eq!(query.error(), Some("Something went wrong"));
  }

  #[tokio::test]
  async fn test_disabled_query_never_fetches() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter_clone = counter.clone();
    let mut query = Query::new(move || {
      counter_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
      async { Ok::<_, String>(1) }
    })
    .enabled(false);

    query.fetch();
    query.refetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(!query.poll());
    assert!(matches!(query.state(), QueryState::Idle));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let mut query = Query::new(|| async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      Ok::<_, String>(42)
    });

    query.fetch();
    assert!(query.is_loading());

    // Second fetch should be no-op
    query.fetch();
    assert!(query.is_loading());
  }

  #[tokio::test]
  async fn test_refetch_keeps_previous_data_visible() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter_clone = counter.clone();
    let mut query = Query::new(move || {
      let n = counter_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
      async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, String>(n)
      }
    });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(50)).await;
    query.poll();
    assert_eq!(query.data(), Some(&0));

    query.refetch();
    assert!(query.is_fetching());
    assert!(!query.is_loading());
    assert_eq!(query.data(), Some(&0));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(query.poll());
    assert_eq!(query.data(), Some(&1));
    assert!(!query.is_fetching());
  }

  #[tokio::test]
  async fn test_failed_refetch_keeps_data() {
    let mut query = Query::new(|| async { Ok::<_, String>(7) });
    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;
    query.poll();

    query.fetch_with(async { Err("offline".to_string()) });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(query.poll());
    assert_eq!(query.data(), Some(&7));
    assert!(query.is_error());
    assert_eq!(query.error(), Some("offline"));

    query.refetch();
    tokio::time::sleep(Duration::from_millis(10)).await;
    query.poll();
    assert!(!query.is_error());
  }

  #[tokio::test]
  async fn test_fetch_with_replaces_data() {
    let mut query = Query::new(|| async { Ok::<_, String>(vec![1]) });
    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;
    query.poll();

    query.fetch_with(async { Ok(vec![1, 2]) });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(query.poll());
    assert_eq!(query.data(), Some(&vec![1, 2]));
  }

  #[tokio::test]
  async fn test_refetch_cancels_pending() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter_clone = counter.clone();

    let mut query = Query::new(move || {
      let counter = counter_clone.clone();
      async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<_, String>(counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
      }
    });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Refetch should cancel the first and start a new one
    query.refetch();
    tokio::time::sleep(Duration::from_millis(100)).await;

    query.poll();
    // Only the second fetch should have completed and been received
    assert_eq!(query.data(), Some(&1));
  }
}

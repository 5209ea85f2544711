//! Bounded retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Additional attempts after the first failure
  pub retries: u32,
  pub base_delay: Duration,
  pub max_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      retries: 2,
      base_delay: Duration::from_secs(1),
      max_delay: Duration::from_secs(30),
    }
  }
}

impl RetryPolicy {
  pub fn with_retries(mut self, retries: u32) -> Self {
    self.retries = retries;
    self
  }

  /// Retry immediately, without sleeping between attempts.
  #[cfg(test)]
  pub fn immediate(retries: u32) -> Self {
    Self {
      retries,
      base_delay: Duration::ZERO,
      max_delay: Duration::ZERO,
    }
  }

  /// Delay before retry number `attempt` (0-based): base * 2^attempt, capped.
  pub fn delay_for(&self, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    self.base_delay.saturating_mul(factor).min(self.max_delay)
  }

  /// Run `op` until it succeeds or the retry budget is spent.
  pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    let mut attempt = 0;
    loop {
      match op().await {
        Ok(value) => return Ok(value),
        Err(e) if attempt < self.retries => {
          let delay = self.delay_for(attempt);
          tracing::warn!(
            "Attempt {} failed ({}), retrying in {:?}",
            attempt + 1,
            e,
            delay
          );
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }
}

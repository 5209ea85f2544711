//! Error types raised by the data client, cache layer and collection store.

use thiserror::Error;

/// Errors surfaced below the UI layer.
#[derive(Debug, Error)]
pub enum PokedexError {
  /// The API answered with a non-success status.
  #[error("Failed to fetch {resource}: {status}")]
  Fetch { resource: String, status: u16 },

  /// The request never produced a response (DNS, connection, TLS, ...).
  #[error("Request for {resource} failed: {message}")]
  Transport { resource: String, message: String },

  /// A response body or stored record could not be decoded.
  #[error("Failed to parse {0}")]
  Parse(String),

  #[error("Failed to read local storage: {0}")]
  StorageRead(String),

  #[error("Failed to write local storage: {0}")]
  StorageWrite(String),

  #[error("Invalid Pokémon id: {0}")]
  InvalidId(u32),
}

impl PokedexError {
  /// HTTP status carried by a fetch failure, if any.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Fetch { status, .. } => Some(*status),
      _ => None,
    }
  }
}

pub type Result<T> = std::result::Result<T, PokedexError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fetch_error_message_contains_status() {
    let err = PokedexError::Fetch {
      resource: "Pokémon list".to_string(),
      status: 503,
    };
    assert!(err.to_string().contains("503"));
    assert_eq!(err.status(), Some(503));
  }

  #[test]
  fn test_non_fetch_errors_have_no_status() {
    assert_eq!(PokedexError::Parse("body".into()).status(), None);
  }
}

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{PokedexError, Result};

/// Durable key-value storage for the collection mirror.
pub trait DurableRecord: Send + Sync {
  /// Read the value stored under `key`, if any.
  fn read(&self, key: &str) -> Result<Option<String>>;

  /// Overwrite the value stored under `key`.
  fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Record kept in memory only. Used when the database cannot be opened,
/// so the collection still works for the current session.
#[derive(Default)]
pub struct MemoryRecord {
  values: Mutex<HashMap<String, String>>,
}

impl MemoryRecord {
  pub fn new() -> Self {
    Self::default()
  }
}

impl DurableRecord for MemoryRecord {
  fn read(&self, key: &str) -> Result<Option<String>> {
    let values = self
      .values
      .lock()
      .map_err(|e| PokedexError::StorageRead(format!("lock poisoned: {}", e)))?;
    Ok(values.get(key).cloned())
  }

  fn write(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self
      .values
      .lock()
      .map_err(|e| PokedexError::StorageWrite(format!("lock poisoned: {}", e)))?;
    values.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::collection::DurableRecord;
use crate::error::{PokedexError, Result};

/// Schema for the key-value table backing durable records.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// SQLite database holding the durable key-value records
pub struct Database {
  conn: Mutex<Connection>,
}

impl Database {
  /// Open or create `pokedex.db` inside `dir`
  pub fn open(dir: &Path) -> Result<Self> {
    std::fs::create_dir_all(dir).map_err(|e| {
      PokedexError::StorageRead(format!(
        "failed to create data directory {}: {}",
        dir.display(),
        e
      ))
    })?;

    let path = dir.join("pokedex.db");
    let conn = Connection::open(&path).map_err(|e| {
      PokedexError::StorageRead(format!(
        "failed to open database at {}: {}",
        path.display(),
        e
      ))
    })?;

    let db = Self {
      conn: Mutex::new(conn),
    };
    db.run_migrations()?;

    Ok(db)
  }

  /// Run database migrations
  fn run_migrations(&self) -> Result<()> {
    self
      .conn()?
      .execute_batch(SCHEMA)
      .map_err(|e| PokedexError::StorageRead(format!("failed to run migrations: {}", e)))
  }

  fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| PokedexError::StorageRead(format!("lock poisoned: {}", e)))
  }
}

impl DurableRecord for Database {
  fn read(&self, key: &str) -> Result<Option<String>> {
    self
      .conn()?
      .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
        row.get(0)
      })
      .optional()
      .map_err(|e| PokedexError::StorageRead(format!("failed to read '{}': {}", key, e)))
  }

  fn write(&self, key: &str, value: &str) -> Result<()> {
    self
      .conn()
      .map_err(|e| PokedexError::StorageWrite(e.to_string()))?
      .execute(
        "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, datetime('now'))",
        params![key, value],
      )
      .map_err(|e| PokedexError::StorageWrite(format!("failed to write '{}': {}", key, e)))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_missing_key_reads_none() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path()).unwrap();
    assert_eq!(db.read("absent").unwrap(), None);
  }

  #[test]
  fn test_write_overwrites() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path()).unwrap();

    db.write("k", "first").unwrap();
    db.write("k", "second").unwrap();
    assert_eq!(db.read("k").unwrap().as_deref(), Some("second"));
  }

  #[test]
  fn test_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
      let db = Database::open(dir.path()).unwrap();
      db.write("k", "[1,2,3]").unwrap();
    }
    let db = Database::open(dir.path()).unwrap();
    assert_eq!(db.read("k").unwrap().as_deref(), Some("[1,2,3]"));
  }
}

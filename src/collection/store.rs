use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::record::DurableRecord;
use crate::error::{PokedexError, Result};
use crate::pokeapi::types::CaughtPokemon;

/// Key of the durable record holding the collection
pub const STORAGE_KEY: &str = "pokedex-caught-pokemon";

#[derive(Debug, Default)]
struct Collection {
  /// Catch order, most recent last
  items: Vec<CaughtPokemon>,
  /// Ids in `items`, for constant-time membership checks
  ids: HashSet<u32>,
}

impl Collection {
  fn from_items(items: Vec<CaughtPokemon>) -> Self {
    let mut collection = Self::default();
    for item in items {
      collection.insert(item);
    }
    collection
  }

  /// Returns false when the id is already present.
  fn insert(&mut self, item: CaughtPokemon) -> bool {
    if !self.ids.insert(item.id) {
      return false;
    }
    self.items.push(item);
    true
  }

  fn remove(&mut self, id: u32) -> bool {
    if !self.ids.remove(&id) {
      return false;
    }
    self.items.retain(|p| p.id != id);
    true
  }
}

/// The caught-Pokémon collection.
///
/// Single writer of the collection: every mutation updates the in-memory set
/// and then overwrites the durable record with the whole set. The record is
/// only read in `load`. Clones share the same state.
#[derive(Clone)]
pub struct CollectionStore {
  state: Arc<Mutex<Collection>>,
  record: Arc<dyn DurableRecord>,
}

impl CollectionStore {
  /// Load the collection from the durable record.
  ///
  /// A missing, unreadable or malformed record yields an empty collection.
  pub fn load(record: Arc<dyn DurableRecord>) -> Self {
    let items = match read_items(record.as_ref()) {
      Ok(items) => items,
      Err(e) => {
        tracing::warn!("Starting with an empty collection: {}", e);
        Vec::new()
      }
    };

    tracing::info!("Loaded {} caught Pokémon", items.len());

    Self {
      state: Arc::new(Mutex::new(Collection::from_items(items))),
      record,
    }
  }

  /// Add a Pokémon. Catching an id that is already present changes nothing.
  pub fn catch(&self, pokemon: CaughtPokemon) {
    let mut state = self.state();
    let id = pokemon.id;
    if state.insert(pokemon) {
      tracing::info!("Caught #{}", id);
      self.persist(&state);
    }
  }

  /// Remove a Pokémon by id. Unknown ids are ignored.
  pub fn release(&self, id: u32) {
    let mut state = self.state();
    if state.remove(id) {
      tracing::info!("Released #{}", id);
      self.persist(&state);
    }
  }

  pub fn is_caught(&self, id: u32) -> bool {
    self.state().ids.contains(&id)
  }

  /// Snapshot of the collection in catch order.
  pub fn caught(&self) -> Vec<CaughtPokemon> {
    self.state().items.clone()
  }

  pub fn len(&self) -> usize {
    self.state().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn state(&self) -> MutexGuard<'_, Collection> {
    // Mutations never leave the set half-updated, so a poisoned lock is still usable
    self.state.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Mirror the whole set to the durable record. Failures are logged only;
  /// the in-memory state stays authoritative.
  fn persist(&self, state: &Collection) {
    let result = serde_json::to_string(&state.items)
      .map_err(|e| PokedexError::StorageWrite(format!("failed to serialize collection: {}", e)))
      .and_then(|json| self.record.write(STORAGE_KEY, &json));

    if let Err(e) = result {
      tracing::warn!("Failed to save collection: {}", e);
    }
  }
}

fn read_items(record: &dyn DurableRecord) -> Result<Vec<CaughtPokemon>> {
  match record.read(STORAGE_KEY)? {
    Some(json) => serde_json::from_str(&json)
      .map_err(|e| PokedexError::Parse(format!("stored collection: {}", e))),
    None => Ok(Vec::new()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::collection::MemoryRecord;

  fn pokemon(id: u32, name: &str) -> CaughtPokemon {
    CaughtPokemon {
      id,
      name: name.to_string(),
      sprite_url: format!("https://example.com/{}.png", id),
      types: vec!["grass".to_string(), "poison".to_string()],
    }
  }

  struct FailingRecord;

  impl DurableRecord for FailingRecord {
    fn read(&self, _key: &str) -> Result<Option<String>> {
      Err(PokedexError::StorageRead("disk on fire".to_string()))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
      Err(PokedexError::StorageWrite("disk on fire".to_string()))
    }
  }

  #[test]
  fn test_starts_empty() {
    let store = CollectionStore::load(Arc::new(MemoryRecord::new()));
    assert!(store.is_empty());
    assert!(!store.is_caught(1));
  }

  #[test]
  fn test_catch_is_idempotent() {
    let store = CollectionStore::load(Arc::new(MemoryRecord::new()));
    store.catch(pokemon(1, "bulbasaur"));
    store.catch(pokemon(1, "bulbasaur"));

    assert_eq!(store.len(), 1);
    assert!(store.is_caught(1));
  }

  #[test]
  fn test_catch_preserves_order() {
    let store = CollectionStore::load(Arc::new(MemoryRecord::new()));
    store.catch(pokemon(25, "pikachu"));
    store.catch(pokemon(1, "bulbasaur"));
    store.catch(pokemon(7, "squirtle"));

    let ids: Vec<u32> = store.caught().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![25, 1, 7]);
  }

  #[test]
  fn test_release() {
    let store = CollectionStore::load(Arc::new(MemoryRecord::new()));
    store.catch(pokemon(1, "bulbasaur"));
    store.catch(pokemon(2, "ivysaur"));

    store.release(1);
    assert!(!store.is_caught(1));
    assert_eq!(store.caught(), vec![pokemon(2, "ivysaur")]);
  }

  #[test]
  fn test_release_absent_is_noop() {
    let record = Arc::new(MemoryRecord::new());
    let store = CollectionStore::load(record.clone());
    store.catch(pokemon(1, "bulbasaur"));
    let before = record.read(STORAGE_KEY).unwrap();

    store.release(42);

    assert_eq!(store.caught(), vec![pokemon(1, "bulbasaur")]);
    assert_eq!(record.read(STORAGE_KEY).unwrap(), before);
  }

  #[test]
  fn test_reload_restores_identical_items() {
    let record = Arc::new(MemoryRecord::new());
    let store = CollectionStore::load(record.clone());
    store.catch(pokemon(1, "bulbasaur"));
    store.catch(pokemon(4, "charmander"));
    drop(store);

    let reloaded = CollectionStore::load(record);
    assert_eq!(
      reloaded.caught(),
      vec![pokemon(1, "bulbasaur"), pokemon(4, "charmander")]
    );
    assert!(reloaded.is_caught(4));
  }

  #[test]
  fn test_mirror_written_in_record_format() {
    let record = Arc::new(MemoryRecord::new());
    let store = CollectionStore::load(record.clone());
    store.catch(pokemon(1, "bulbasaur"));

    let json = record.read(STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["id"], 1);
    assert_eq!(value[0]["spriteUrl"], "https://example.com/1.png");
  }

  #[test]
  fn test_malformed_record_starts_empty() {
    let record = Arc::new(MemoryRecord::new());
    record.write(STORAGE_KEY, "{not json").unwrap();

    let store = CollectionStore::load(record);
    assert!(store.is_empty());
  }

  #[test]
  fn test_storage_failures_do_not_block_mutations() {
    let store = CollectionStore::load(Arc::new(FailingRecord));
    assert!(store.is_empty());

    store.catch(pokemon(1, "bulbasaur"));
    assert!(store.is_caught(1));

    store.release(1);
    assert!(!store.is_caught(1));
  }

  #[test]
  fn test_clones_share_state() {
    let store = CollectionStore::load(Arc::new(MemoryRecord::new()));
    let other = store.clone();
    other.catch(pokemon(1, "bulbasaur"));
    assert!(store.is_caught(1));
  }

  #[test]
  fn test_concurrent_catches_keep_ids_unique() {
    let store = CollectionStore::load(Arc::new(MemoryRecord::new()));
    let handles: Vec<_> = (0..8)
      .map(|_| {
        let store = store.clone();
        std::thread::spawn(move || {
          for id in 1..=20 {
            store.catch(pokemon(id, "x"));
          }
        })
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }
    assert_eq!(store.len(), 20);
  }
}

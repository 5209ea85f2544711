//! Caching implementations for PokeAPI types.

use crate::cache::{Cacheable, QueryKey};

use super::types::{PokemonDetail, PokemonListItem, PokemonPages};

// ============================================================================
// Cacheable implementations
// ============================================================================

impl Cacheable for PokemonPages {
  fn entity_type() -> &'static str {
    "pokemon_pages"
  }
}

impl Cacheable for Vec<PokemonListItem> {
  fn entity_type() -> &'static str {
    "pokemon_names"
  }
}

impl Cacheable for PokemonDetail {
  fn entity_type() -> &'static str {
    "pokemon_detail"
  }
}

// ============================================================================
// Query key types
// ============================================================================

/// Query key types for PokeAPI calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PokeQueryKey {
  /// The load-more list; a single entry holding every loaded page
  PokemonList,
  /// The full name index used for search
  AllNames,
  /// A single Pokémon by id
  Detail { id: u32 },
}

impl QueryKey for PokeQueryKey {
  fn cache_key(&self) -> String {
    match self {
      Self::PokemonList => "pokemon-list".to_string(),
      Self::AllNames => "pokemon-all-names".to_string(),
      Self::Detail { id } => format!("pokemon-detail:{}", id),
    }
  }

  fn description(&self) -> String {
    match self {
      Self::PokemonList => "Pokémon list".to_string(),
      Self::AllNames => "all Pokémon names".to_string(),
      Self::Detail { id } => format!("Pokémon #{}", id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cache_keys_are_distinct() {
    let keys = [
      PokeQueryKey::PokemonList,
      PokeQueryKey::AllNames,
      PokeQueryKey::Detail { id: 1 },
      PokeQueryKey::Detail { id: 2 },
    ];
    let unique: std::collections::HashSet<String> = keys.iter().map(|k| k.cache_key()).collect();
    assert_eq!(unique.len(), keys.len());
  }
}

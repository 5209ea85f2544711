//! Serde-deserializable types matching PokeAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;
use std::collections::HashMap;

use super::types::{Ability, PokemonDetail, PokemonListItem, Stat};
use crate::error::{PokedexError, Result};

// ============================================================================
// List endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiNamedResource {
  pub name: String,
  pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiListResponse {
  pub count: u32,
  #[allow(dead_code)]
  pub next: Option<String>,
  #[allow(dead_code)]
  pub previous: Option<String>,
  #[serde(default)]
  pub results: Vec<ApiNamedResource>,
}

// ============================================================================
// Detail endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiTypeSlot {
  #[allow(dead_code)]
  pub slot: u32,
  #[serde(rename = "type")]
  pub type_ref: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiAbilitySlot {
  pub ability: ApiNamedResource,
  #[serde(default)]
  pub is_hidden: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiStat {
  pub base_stat: u16,
  pub stat: ApiNamedResource,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiArtwork {
  pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiSprites {
  pub front_default: Option<String>,
  // "official-artwork", "home", "dream_world", ...
  #[serde(default)]
  pub other: HashMap<String, ApiArtwork>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
  pub id: u32,
  pub name: String,
  #[serde(default)]
  pub height: u32,
  #[serde(default)]
  pub weight: u32,
  #[serde(default)]
  pub types: Vec<ApiTypeSlot>,
  #[serde(default)]
  pub abilities: Vec<ApiAbilitySlot>,
  #[serde(default)]
  pub stats: Vec<ApiStat>,
  #[serde(default)]
  pub sprites: ApiSprites,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl ApiNamedResource {
  /// Build a list item, deriving the id from the resource URL.
  pub fn into_list_item(self, sprite_base: &str) -> Result<PokemonListItem> {
    let id = extract_id_from_url(&self.url)?;
    Ok(PokemonListItem {
      id,
      name: self.name,
      sprite_url: sprite_url(sprite_base, id),
    })
  }
}

impl ApiListResponse {
  pub fn into_items(self, sprite_base: &str) -> Result<Vec<PokemonListItem>> {
    self
      .results
      .into_iter()
      .map(|r| r.into_list_item(sprite_base))
      .collect()
  }
}

impl From<ApiPokemon> for PokemonDetail {
  fn from(p: ApiPokemon) -> Self {
    let mut sprites = p.sprites;
    let artwork_url = sprites
      .other
      .remove("official-artwork")
      .and_then(|a| a.front_default);

    PokemonDetail {
      id: p.id,
      name: p.name,
      height: p.height,
      weight: p.weight,
      types: p.types.into_iter().map(|t| t.type_ref.name).collect(),
      abilities: p
        .abilities
        .into_iter()
        .map(|a| Ability {
          name: a.ability.name,
          is_hidden: a.is_hidden,
        })
        .collect(),
      stats: p
        .stats
        .into_iter()
        .map(|s| Stat {
          name: s.stat.name,
          base_stat: s.base_stat.min(u16::from(u8::MAX)) as u8,
        })
        .collect(),
      sprite_url: sprites.front_default,
      artwork_url,
    }
  }
}

// ============================================================================
// Helpers
// ============================================================================

/// Sprite location for a Pokémon id: `{sprite_base}/{id}.png`
pub fn sprite_url(sprite_base: &str, id: u32) -> String {
  format!("{}/{}.png", sprite_base.trim_end_matches('/'), id)
}

/// Parse the numeric id from the last path segment of a resource URL,
/// e.g. `https://pokeapi.co/api/v2/pokemon/25/` -> 25
pub fn extract_id_from_url(url: &str) -> Result<u32> {
  url
    .trim_end_matches('/')
    .rsplit('/')
    .next()
    .and_then(|segment| segment.parse().ok())
    .ok_or_else(|| PokedexError::Parse(format!("resource id from URL '{}'", url)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_id_with_trailing_slash() {
    assert_eq!(
      extract_id_from_url("https://pokeapi.co/api/v2/pokemon/1/").unwrap(),
      1
    );
  }

  #[test]
  fn test_extract_id_without_trailing_slash() {
    assert_eq!(
      extract_id_from_url("https://pokeapi.co/api/v2/pokemon/10025").unwrap(),
      10025
    );
  }

  #[test]
  fn test_extract_id_rejects_non_numeric() {
    assert!(extract_id_from_url("https://pokeapi.co/api/v2/pokemon/pikachu/").is_err());
  }

  #[test]
  fn test_sprite_url() {
    assert_eq!(sprite_url("https://x/sprites/", 7), "https://x/sprites/7.png");
  }

  #[test]
  fn test_detail_conversion_keeps_order() {
    let json = serde_json::json!({
      "id": 1,
      "name": "bulbasaur",
      "height": 7,
      "weight": 69,
      "types": [
        { "slot": 1, "type": { "name": "grass", "url": "" } },
        { "slot": 2, "type": { "name": "poison", "url": "" } }
      ],
      "abilities": [
        { "ability": { "name": "overgrow", "url": "" }, "is_hidden": false, "slot": 1 },
        { "ability": { "name": "chlorophyll", "url": "" }, "is_hidden": true, "slot": 3 }
      ],
      "stats": [
        { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } },
        { "base_stat": 49, "effort": 0, "stat": { "name": "attack", "url": "" } }
      ],
      "sprites": {
        "front_default": "https://example.com/1.png",
        "other": { "official-artwork": { "front_default": "https://example.com/1-art.png" } }
      }
    });

    let api: ApiPokemon = serde_json::from_value(json).unwrap();
    let detail = PokemonDetail::from(api);

    assert_eq!(detail.types, vec!["grass", "poison"]);
    assert_eq!(detail.primary_type(), Some("grass"));
    assert!(detail.abilities[1].is_hidden);
    assert_eq!(detail.stats[1].name, "attack");
    assert_eq!(detail.stats[1].base_stat, 49);
    assert_eq!(
      detail.artwork_url.as_deref(),
      Some("https://example.com/1-art.png")
    );
  }

  #[test]
  fn test_detail_without_sprites() {
    let json = serde_json::json!({ "id": 0, "name": "missingno" });
    let detail = PokemonDetail::from(serde_json::from_value::<ApiPokemon>(json).unwrap());
    assert_eq!(detail.image_url(), None);
    assert!(detail.types.is_empty());
  }
}

use serde::{Deserialize, Serialize};

use crate::cache::{InfinitePages, Page};

/// Summary of a Pokémon for list views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonListItem {
  pub id: u32,
  pub name: String,
  pub sprite_url: String,
}

/// One page of the paginated list endpoint
pub type PokemonPage = Page<PokemonListItem>;

/// Pages loaded so far by the load-more list
pub type PokemonPages = InfinitePages<PokemonListItem>;

/// Case-insensitive substring match on names. A blank query matches nothing.
pub fn search_names<'a>(items: &'a [PokemonListItem], query: &str) -> Vec<&'a PokemonListItem> {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return Vec::new();
  }

  items
    .iter()
    .filter(|p| p.name.to_lowercase().contains(&query))
    .collect()
}

/// Full Pokémon details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
  pub id: u32,
  pub name: String,
  /// Decimetres
  pub height: u32,
  /// Hectograms
  pub weight: u32,
  /// Type names in slot order; the first is the primary type
  pub types: Vec<String>,
  pub abilities: Vec<Ability>,
  pub stats: Vec<Stat>,
  pub sprite_url: Option<String>,
  pub artwork_url: Option<String>,
}

impl PokemonDetail {
  /// Best image for the detail view: official artwork, then the basic sprite.
  pub fn image_url(&self) -> Option<&str> {
    self.artwork_url.as_deref().or(self.sprite_url.as_deref())
  }

  pub fn primary_type(&self) -> Option<&str> {
    self.types.first().map(String::as_str)
  }

  pub fn height_metres(&self) -> f64 {
    f64::from(self.height) / 10.0
  }

  pub fn weight_kilograms(&self) -> f64 {
    f64::from(self.weight) / 10.0
  }

  /// Entry stored in the collection when this Pokémon is caught.
  pub fn to_caught(&self) -> CaughtPokemon {
    CaughtPokemon {
      id: self.id,
      name: self.name.clone(),
      sprite_url: self.sprite_url.clone().unwrap_or_default(),
      types: self.types.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
  pub name: String,
  pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
  pub name: String,
  pub base_stat: u8,
}

/// A Pokémon in the user's collection.
///
/// Serialized in camelCase; this is the on-disk record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaughtPokemon {
  pub id: u32,
  pub name: String,
  pub sprite_url: String,
  #[serde(default)]
  pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn detail(sprite: Option<&str>, artwork: Option<&str>) -> PokemonDetail {
    PokemonDetail {
      id: 25,
      name: "pikachu".to_string(),
      height: 4,
      weight: 60,
      types: vec!["electric".to_string()],
      abilities: Vec::new(),
      stats: Vec::new(),
      sprite_url: sprite.map(String::from),
      artwork_url: artwork.map(String::from),
    }
  }

  #[test]
  fn test_image_prefers_artwork() {
    let d = detail(Some("sprite.png"), Some("art.png"));
    assert_eq!(d.image_url(), Some("art.png"));
  }

  #[test]
  fn test_image_falls_back_to_sprite() {
    let d = detail(Some("sprite.png"), None);
    assert_eq!(d.image_url(), Some("sprite.png"));
  }

  #[test]
  fn test_image_missing() {
    assert_eq!(detail(None, None).image_url(), None);
  }

  #[test]
  fn test_to_caught_uses_basic_sprite() {
    let caught = detail(None, Some("art.png")).to_caught();
    assert_eq!(caught.id, 25);
    assert_eq!(caught.sprite_url, "");
    assert_eq!(caught.types, vec!["electric".to_string()]);
  }

  #[test]
  fn test_caught_record_format() {
    let caught = detail(Some("s.png"), None).to_caught();
    let json = serde_json::to_value(&caught).unwrap();
    assert_eq!(json["spriteUrl"], "s.png");
    assert_eq!(json["types"][0], "electric");
  }

  #[test]
  fn test_search_names() {
    let items: Vec<PokemonListItem> = ["bulbasaur", "ivysaur", "charmander"]
      .iter()
      .enumerate()
      .map(|(i, name)| PokemonListItem {
        id: i as u32 + 1,
        name: name.to_string(),
        sprite_url: String::new(),
      })
      .collect();

    let hits: Vec<&str> = search_names(&items, "  SAUR ")
      .iter()
      .map(|p| p.name.as_str())
      .collect();
    assert_eq!(hits, vec!["bulbasaur", "ivysaur"]);
    assert!(search_names(&items, "   ").is_empty());
    assert!(search_names(&items, "mew").is_empty());
  }

  #[test]
  fn test_units() {
    let d = detail(None, None);
    assert!((d.height_metres() - 0.4).abs() < f64::EPSILON);
    assert!((d.weight_kilograms() - 6.0).abs() < f64::EPSILON);
  }
}

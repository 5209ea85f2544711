use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{PokedexError, Result};
use crate::pokeapi::api_types::{ApiListResponse, ApiPokemon};
use crate::pokeapi::transport::{ReqwestTransport, Transport};
use crate::pokeapi::types::{PokemonDetail, PokemonListItem, PokemonPage};

/// PokeAPI client wrapper
#[derive(Clone)]
pub struct PokeClient {
  transport: Arc<dyn Transport>,
  base_url: String,
  sprite_base_url: String,
  all_names_limit: u32,
}

impl PokeClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let transport = ReqwestTransport::new()?;
    Ok(Self::with_transport(config, Arc::new(transport)))
  }

  pub fn with_transport(config: &ApiConfig, transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      sprite_base_url: config.sprite_base_url.clone(),
      all_names_limit: config.all_names_limit,
    }
  }

  /// Get one page of the Pokémon list
  pub async fn fetch_page(&self, limit: u32, offset: u32) -> Result<PokemonPage> {
    if limit == 0 {
      return Err(PokedexError::Parse("page request with limit 0".to_string()));
    }

    let url = self.endpoint(&format!("/pokemon?limit={}&offset={}", limit, offset))?;
    let response: ApiListResponse = self.get_json(&url, "Pokémon list").await?;

    let total = response.count;
    let items = response.into_items(&self.sprite_base_url)?;

    Ok(PokemonPage { items, total })
  }

  /// Get the whole name index in a single oversized page.
  ///
  /// The limit is a fixed upper bound rather than the reported count, so a
  /// catalog larger than `all_names_limit` is silently truncated.
  pub async fn fetch_all_names(&self) -> Result<Vec<PokemonListItem>> {
    let url = self.endpoint(&format!(
      "/pokemon?limit={}&offset=0",
      self.all_names_limit
    ))?;
    let response: ApiListResponse = self.get_json(&url, "Pokémon names").await?;

    response.into_items(&self.sprite_base_url)
  }

  /// Get a single Pokémon by id
  pub async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail> {
    let url = self.endpoint(&format!("/pokemon/{}", id))?;
    let response: ApiPokemon = self.get_json(&url, &format!("Pokémon #{}", id)).await?;

    Ok(response.into())
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    let raw = format!("{}{}", self.base_url, path);
    Url::parse(&raw).map_err(|e| PokedexError::Parse(format!("URL '{}': {}", raw, e)))
  }

  async fn get_json<T: DeserializeOwned>(&self, url: &Url, resource: &str) -> Result<T> {
    tracing::debug!("GET {}", url);

    let response = self.transport.get(url).await?;
    if !response.is_success() {
      return Err(PokedexError::Fetch {
        resource: resource.to_string(),
        status: response.status,
      });
    }

    serde_json::from_slice(&response.body)
      .map_err(|e| PokedexError::Parse(format!("{} response: {}", resource, e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pokeapi::transport::testing::ScriptedTransport;
  use serde_json::json;

  fn list_response() -> serde_json::Value {
    json!({
      "count": 1350,
      "next": "https://pokeapi.co/api/v2/pokemon?offset=20&limit=20",
      "previous": null,
      "results": [
        { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
        { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
      ]
    })
  }

  fn detail_response() -> serde_json::Value {
    json!({
      "id": 25,
      "name": "pikachu",
      "height": 4,
      "weight": 60,
      "types": [{ "slot": 1, "type": { "name": "electric", "url": "" } }],
      "abilities": [{ "ability": { "name": "static", "url": "" }, "is_hidden": false, "slot": 1 }],
      "stats": [{ "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } }],
      "sprites": {
        "front_default": "https://example.com/25.png",
        "other": { "official-artwork": { "front_default": "https://example.com/25-art.png" } }
      }
    })
  }

  fn client(transport: Arc<ScriptedTransport>) -> PokeClient {
    PokeClient::with_transport(&ApiConfig::default(), transport)
  }

  #[tokio::test]
  async fn test_fetch_page_transforms_results() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(list_response());

    let page = client(transport.clone()).fetch_page(20, 0).await.unwrap();

    assert_eq!(page.total, 1350);
    assert_eq!(page.items.len(), 2);
    assert_eq!(
      page.items[0],
      PokemonListItem {
        id: 1,
        name: "bulbasaur".to_string(),
        sprite_url: "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png"
          .to_string(),
      }
    );
    assert_eq!(page.items[1].id, 2);
    assert!(page.items[1].sprite_url.ends_with("/2.png"));
    assert_eq!(
      transport.requests(),
      vec!["https://pokeapi.co/api/v2/pokemon?limit=20&offset=0"]
    );
  }

  #[tokio::test]
  async fn test_fetch_page_non_success_includes_status() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(500);

    let err = client(transport).fetch_page(20, 0).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("Failed to fetch"));
    assert!(err.to_string().contains("500"));
  }

  #[tokio::test]
  async fn test_fetch_page_rejects_zero_limit() {
    let transport = Arc::new(ScriptedTransport::new());
    assert!(client(transport.clone()).fetch_page(0, 0).await.is_err());
    assert_eq!(transport.request_count(), 0);
  }

  #[tokio::test]
  async fn test_fetch_page_malformed_body() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push(200, b"not json".to_vec());

    let err = client(transport).fetch_page(20, 0).await.unwrap_err();
    assert!(matches!(err, PokedexError::Parse(_)));
  }

  #[tokio::test]
  async fn test_fetch_detail() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(detail_response());

    let detail = client(transport.clone()).fetch_detail(25).await.unwrap();

    assert_eq!(detail.name, "pikachu");
    assert_eq!(detail.id, 25);
    assert_eq!(detail.image_url(), Some("https://example.com/25-art.png"));
    assert_eq!(
      transport.requests(),
      vec!["https://pokeapi.co/api/v2/pokemon/25"]
    );
  }

  #[tokio::test]
  async fn test_fetch_detail_not_found() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(404);

    let err = client(transport).fetch_detail(99999).await.unwrap_err();
    assert!(err.to_string().contains("404"));
    assert!(err.to_string().contains("#99999"));
  }

  #[tokio::test]
  async fn test_fetch_all_names_uses_fixed_limit() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(list_response());

    let names = client(transport.clone()).fetch_all_names().await.unwrap();

    assert_eq!(names.len(), 2);
    assert_eq!(names[0].name, "bulbasaur");
    assert_eq!(
      transport.requests(),
      vec!["https://pokeapi.co/api/v2/pokemon?limit=1500&offset=0"]
    );
  }
}

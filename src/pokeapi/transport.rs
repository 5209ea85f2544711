//! HTTP seam between the PokeAPI client and the network.

use async_trait::async_trait;
use url::Url;

use crate::error::{PokedexError, Result};

/// Raw HTTP response: status code plus body bytes.
#[derive(Debug, Clone)]
pub struct TransportResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

impl TransportResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Anything that can perform a GET request.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

/// Transport backed by a shared reqwest client.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
}

impl ReqwestTransport {
  pub fn new() -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| PokedexError::Transport {
        resource: "HTTP client".to_string(),
        message: e.to_string(),
      })?;

    Ok(Self { client })
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn get(&self, url: &Url) -> Result<TransportResponse> {
    let transport_err = |e: reqwest::Error| PokedexError::Transport {
      resource: url.to_string(),
      message: e.to_string(),
    };

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(transport_err)?;

    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(transport_err)?.to_vec();

    Ok(TransportResponse { status, body })
  }
}

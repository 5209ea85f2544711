//! PokeAPI access: raw client, response types and the cached client the UI uses.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod transport;
pub mod types;

pub use cached_client::CachedPokeClient;

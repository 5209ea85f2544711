//! The user's caught-Pokémon collection and its durable mirror.

mod record;
mod store;

pub use record::{DurableRecord, MemoryRecord};
pub use store::CollectionStore;

mod collection;
mod pokemon_detail;
mod pokemon_list;

pub use collection::CollectionView;
pub use pokemon_detail::PokemonDetailView;
pub use pokemon_list::PokemonListView;

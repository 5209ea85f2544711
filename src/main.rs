mod app;
mod cache;
mod collection;
mod commands;
mod config;
mod db;
mod error;
mod event;
mod logging;
mod pokeapi;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::collection::{CollectionStore, DurableRecord, MemoryRecord};
use crate::pokeapi::CachedPokeClient;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse Pokémon from PokeAPI and keep track of the ones you catch")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./pokedex.yaml or $XDG_CONFIG_HOME/pokedex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Number of Pokémon fetched per page
  #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
  page_size: Option<u32>,

  /// Directory for the collection database and log file
  #[arg(long)]
  data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(page_size) = args.page_size {
    config.list.page_size = page_size;
  }
  if let Some(dir) = args.data_dir {
    config.storage.path = Some(dir);
  }

  let data_dir = config.data_dir()?;
  let _log_guard = logging::init(&data_dir)?;

  let record: Arc<dyn DurableRecord> = match db::Database::open(&data_dir) {
    Ok(db) => Arc::new(db),
    Err(e) => {
      tracing::warn!("Collection will not be saved this session: {}", e);
      Arc::new(MemoryRecord::new())
    }
  };
  let collection = CollectionStore::load(record);
  let client = CachedPokeClient::new(&config)?;

  let mut app = app::App::new(client, collection);
  app.run().await?;

  Ok(())
}

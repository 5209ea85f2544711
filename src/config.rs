use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_SPRITE_BASE_URL: &str =
  "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub list: ListConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_sprite_base_url")]
  pub sprite_base_url: String,
  /// Page size used to pull the whole name index in one request
  #[serde(default = "default_all_names_limit")]
  pub all_names_limit: u32,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      sprite_base_url: default_sprite_base_url(),
      all_names_limit: default_all_names_limit(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
  #[serde(default = "default_page_size")]
  pub page_size: u32,
}

impl Default for ListConfig {
  fn default() -> Self {
    Self {
      page_size: default_page_size(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Disable to always go to the network
  #[serde(default = "default_true")]
  pub enabled: bool,
  #[serde(default = "default_list_stale_minutes")]
  pub list_stale_minutes: i64,
  #[serde(default = "default_names_stale_minutes")]
  pub names_stale_minutes: i64,
  #[serde(default = "default_detail_stale_minutes")]
  pub detail_stale_minutes: i64,
  /// Additional attempts after the first failed request
  #[serde(default = "default_retries")]
  pub retries: u32,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      list_stale_minutes: default_list_stale_minutes(),
      names_stale_minutes: default_names_stale_minutes(),
      detail_stale_minutes: default_detail_stale_minutes(),
      retries: default_retries(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
  /// Directory for the collection database and log file
  /// (default: $XDG_DATA_HOME/pokedex)
  pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_sprite_base_url() -> String {
  DEFAULT_SPRITE_BASE_URL.to_string()
}

fn default_all_names_limit() -> u32 {
  1500
}

fn default_page_size() -> u32 {
  24
}

fn default_true() -> bool {
  true
}

fn default_list_stale_minutes() -> i64 {
  10
}

fn default_names_stale_minutes() -> i64 {
  30
}

fn default_detail_stale_minutes() -> i64 {
  10
}

fn default_retries() -> u32 {
  2
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./pokedex.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/pokedex/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("pokedex.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("pokedex").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.list.page_size == 0 {
      return Err(eyre!("list.page_size must be greater than zero"));
    }
    Ok(config)
  }

  /// Directory holding the collection database and logs.
  pub fn data_dir(&self) -> Result<PathBuf> {
    if let Some(path) = &self.storage.path {
      return Ok(path.clone());
    }

    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("pokedex"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.all_names_limit, 1500);
    assert_eq!(config.list.page_size, 24);
    assert_eq!(config.cache.list_stale_minutes, 10);
    assert_eq!(config.cache.names_stale_minutes, 30);
    assert_eq!(config.cache.retries, 2);
    assert!(config.cache.enabled);
  }

  #[test]
  fn test_partial_override() {
    let yaml = "list:\n  page_size: 48\ncache:\n  retries: 0\n";
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.list.page_size, 48);
    assert_eq!(config.cache.retries, 0);
    assert_eq!(config.cache.detail_stale_minutes, 10);
  }

  #[test]
  fn test_zero_page_size_rejected() {
    assert!(Config::parse("list:\n  page_size: 0\n").is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here.yaml")));
    assert!(result.is_err());
  }

  #[test]
  fn test_storage_path_overrides_data_dir() {
    let config = Config::parse("storage:\n  path: /tmp/pokedex-test\n").unwrap();
    assert_eq!(
      config.data_dir().unwrap(),
      PathBuf::from("/tmp/pokedex-test")
    );
  }
}

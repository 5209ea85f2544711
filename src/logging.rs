use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Route tracing output to `<dir>/pokedex.log`.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// The returned guard must live for the whole program to flush the writer.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let file_appender = tracing_appender::rolling::never(dir, "pokedex.log");
  let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

  let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

  let file_layer = tracing_subscriber::fmt::layer()
    .with_writer(non_blocking_file)
    .with_ansi(false);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  tracing::info!("Log file: {}/pokedex.log", dir.display());

  Ok(guard)
}

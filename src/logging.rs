//! Tracing subscriber setup for host applications.
//!
//! The library itself only emits `tracing` events. Hosts that have no
//! subscriber of their own can call `init` once at startup.

use color_eyre::{eyre::eyre, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::LoggingConfig;

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Install a global subscriber.
///
/// RUST_LOG takes precedence over `config.level`. With a log directory the
/// output goes to a daily-rotated `preset-store.log` through a background
/// writer; keep the returned guard alive or buffered lines are lost.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
  let (subscriber, guard) = build_subscriber(config)?;
  tracing::subscriber::set_global_default(subscriber)
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;
  Ok(guard)
}

fn build_subscriber(config: &LoggingConfig) -> Result<(BoxedSubscriber, Option<WorkerGuard>)> {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&config.level))
    .map_err(|e| eyre!("Invalid log filter {}: {}", config.level, e))?;

  let registry = tracing_subscriber::registry().with(filter);

  match &config.directory {
    Some(dir) => {
      let appender = tracing_appender::rolling::daily(dir, "preset-store.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let subscriber = registry.with(fmt::layer().with_writer(writer).with_ansi(false));
      Ok((Box::new(subscriber), Some(guard)))
    }
    None => {
      let subscriber = registry.with(fmt::layer().with_writer(std::io::stderr).with_target(true));
      Ok((Box::new(subscriber), None))
    }
  }
}

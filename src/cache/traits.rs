//! Types describing where a read was served from.

use chrono::{DateTime, Utc};

/// Result of a tiered read, including the tier that answered.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the snapshot was cached (cache hits only)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> Sourced<T> {
  /// Fresh data from the remote store.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// A live cache snapshot.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
      cached_at: Some(cached_at),
    }
  }

  /// Remote unreachable, serving the on-device backup.
  pub fn local_fallback(data: T) -> Self {
    Self {
      data,
      source: CacheSource::LocalFallback,
      cached_at: None,
    }
  }
}

/// Indicates which tier served a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from the remote store
  Network,
  /// In-memory snapshot younger than the TTL
  CacheFresh,
  /// Remote unavailable (or missing the record), served from the local mirror
  LocalFallback,
}

//! Namespace-keyed list cache with a fixed time-to-live.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::debug;

use crate::preset::Preset;

/// Snapshots expire five minutes after population.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
  presets: Vec<Preset>,
  populated_at: Instant,
  cached_at: DateTime<Utc>,
}

/// Process-lifetime cache of list results, one entry per namespace.
///
/// A single mutex guards the map; every `put` replaces the entry in one
/// assignment so readers never see a partially built snapshot.
pub struct TtlCache {
  entries: Mutex<HashMap<String, CacheEntry>>,
  ttl: Duration,
}

impl TtlCache {
  pub fn new() -> Self {
    Self::with_ttl(DEFAULT_TTL)
  }

  pub fn with_ttl(ttl: Duration) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      ttl,
    }
  }

  /// Live snapshot for `namespace` and the wall-clock time it was cached.
  ///
  /// An entry whose age has reached the TTL is a miss and is dropped.
  pub fn get(&self, namespace: &str) -> Option<(Vec<Preset>, DateTime<Utc>)> {
    let mut entries = self.lock();
    let expired = match entries.get(namespace) {
      Some(entry) if entry.populated_at.elapsed() < self.ttl => {
        debug!(namespace, "preset cache hit");
        return Some((entry.presets.clone(), entry.cached_at));
      }
      Some(_) => true,
      None => false,
    };

    if expired {
      entries.remove(namespace);
    }
    debug!(namespace, expired, "preset cache miss");
    None
  }

  /// Store a snapshot, replacing any prior entry and restarting its TTL.
  pub fn put(&self, namespace: &str, presets: Vec<Preset>) {
    let entry = CacheEntry {
      presets,
      populated_at: Instant::now(),
      cached_at: Utc::now(),
    };
    self.lock().insert(namespace.to_string(), entry);
  }

  pub fn invalidate(&self, namespace: &str) {
    if self.lock().remove(namespace).is_some() {
      debug!(namespace, "preset cache invalidated");
    }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    // The map is always left consistent, so a poisoned lock is still usable
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl Default for TtlCache {
  fn default() -> Self {
    Self::new()
  }
}

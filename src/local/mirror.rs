//! Bounded per-namespace preset list over a `KvBackend`.

use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::KvBackend;
use crate::error::PresetError;
use crate::preset::Preset;

/// Local lists keep at most this many presets.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Most-recent-first backup list of presets for each namespace.
///
/// Every operation is a whole-list read-modify-write against the backend with
/// no lock held across the two steps. Two writers racing on one namespace can
/// lose an update; callers that need more must serialize themselves.
#[derive(Clone)]
pub struct LocalMirror {
  backend: Arc<dyn KvBackend>,
  max_entries: usize,
}

impl LocalMirror {
  pub fn new(backend: Arc<dyn KvBackend>) -> Self {
    Self {
      backend,
      max_entries: DEFAULT_MAX_ENTRIES,
    }
  }

  pub fn with_max_entries(mut self, max_entries: usize) -> Self {
    self.max_entries = max_entries;
    self
  }

  /// All backed-up presets, newest first. Absent or corrupt storage is empty.
  pub fn list_all(&self, namespace: &str) -> Vec<Preset> {
    match self.read_list(namespace) {
      Ok(presets) => presets,
      Err(e) => {
        warn!(namespace, error = %e, "treating local presets as empty");
        Vec::new()
      }
    }
  }

  pub fn get_by_id(&self, namespace: &str, id: &str) -> Option<Preset> {
    self.list_all(namespace).into_iter().find(|p| p.id == id)
  }

  /// Put `preset` at the front, dropping any older copy with the same id and
  /// evicting the oldest entries past the cap.
  pub fn upsert_front(&self, namespace: &str, preset: Preset) {
    let mut presets = self.list_all(namespace);
    presets.retain(|p| p.id != preset.id);
    presets.insert(0, preset);
    presets.truncate(self.max_entries);
    self.write_list(namespace, &presets);
  }

  pub fn remove(&self, namespace: &str, id: &str) {
    let mut presets = self.list_all(namespace);
    presets.retain(|p| p.id != id);
    self.write_list(namespace, &presets);
  }

  fn read_list(&self, namespace: &str) -> Result<Vec<Preset>, PresetError> {
    let bytes = self
      .backend
      .get(&storage_key(namespace))
      .map_err(|e| PresetError::LocalStorageCorrupt(e.to_string()))?;

    match bytes {
      Some(bytes) => serde_json::from_slice(&bytes)
        .map_err(|e| PresetError::LocalStorageCorrupt(e.to_string())),
      None => Ok(Vec::new()),
    }
  }

  fn write_list(&self, namespace: &str, presets: &[Preset]) {
    let bytes = match serde_json::to_vec(presets) {
      Ok(bytes) => bytes,
      Err(e) => {
        warn!(namespace, error = %e, "failed to encode local presets");
        return;
      }
    };

    match self.backend.set(&storage_key(namespace), &bytes) {
      Ok(()) => debug!(namespace, count = presets.len(), "local presets written"),
      Err(e) => warn!(namespace, error = %e, "failed to write local presets"),
    }
  }
}

fn storage_key(namespace: &str) -> String {
  format!("ys_presets_{}", namespace)
}

//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::{RemoteError, RemoteResult};
use crate::host::{ParameterHost, StoreEvent};
use crate::preset::{CreatedAt, Parameters, Preset, PresetDraft};
use crate::remote::RemoteStore;

pub fn preset(id: &str) -> Preset {
  Preset {
    id: id.to_string(),
    namespace: "synth-x".to_string(),
    name: format!("Preset {}", id),
    description: String::new(),
    parameters: Parameters::new(),
    author: "YS Studio".to_string(),
    created_at: CreatedAt::client(Utc::now()),
    tool_version: "1.0.0".to_string(),
  }
}

pub fn params(value: serde_json::Value) -> Parameters {
  match value {
    serde_json::Value::Object(map) => map,
    other => panic!("expected a JSON object, got {}", other),
  }
}

/// In-memory `RemoteStore` that counts calls and can be taken offline.
pub struct FakeRemote {
  docs: Mutex<HashMap<(String, String), Preset>>,
  reachable: AtomicBool,
  ticks: AtomicUsize,
  pub creates: AtomicUsize,
  pub gets: AtomicUsize,
  pub lists: AtomicUsize,
  pub deletes: AtomicUsize,
  /// `max_count` passed to the most recent `list_recent` call
  pub last_list_limit: AtomicUsize,
}

impl FakeRemote {
  pub fn new() -> Self {
    Self {
      docs: Mutex::new(HashMap::new()),
      reachable: AtomicBool::new(true),
      ticks: AtomicUsize::new(0),
      creates: AtomicUsize::new(0),
      gets: AtomicUsize::new(0),
      lists: AtomicUsize::new(0),
      deletes: AtomicUsize::new(0),
      last_list_limit: AtomicUsize::new(0),
    }
  }

  pub fn unreachable() -> Self {
    let remote = Self::new();
    remote.set_reachable(false);
    remote
  }

  pub fn set_reachable(&self, reachable: bool) {
    self.reachable.store(reachable, Ordering::SeqCst);
  }

  pub fn contains(&self, namespace: &str, id: &str) -> bool {
    self
      .docs
      .lock()
      .unwrap()
      .contains_key(&(namespace.to_string(), id.to_string()))
  }

  pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
  }

  fn guard(&self, counter: &AtomicUsize) -> RemoteResult<()> {
    counter.fetch_add(1, Ordering::SeqCst);
    if self.reachable.load(Ordering::SeqCst) {
      Ok(())
    } else {
      Err(RemoteError::Unavailable("connection refused".to_string()))
    }
  }

  /// Strictly increasing server clock so ordering is deterministic.
  fn server_now(&self) -> DateTime<Utc> {
    let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
    Utc::now() + Duration::milliseconds(tick)
  }
}

#[async_trait]
impl RemoteStore for FakeRemote {
  async fn create(
    &self,
    namespace: &str,
    preset_id: &str,
    draft: &PresetDraft,
  ) -> RemoteResult<DateTime<Utc>> {
    self.guard(&self.creates)?;
    let at = self.server_now();
    let preset = draft
      .clone()
      .into_preset(preset_id.to_string(), namespace, CreatedAt::server(at));
    self
      .docs
      .lock()
      .unwrap()
      .insert((namespace.to_string(), preset_id.to_string()), preset);
    Ok(at)
  }

  async fn get_by_id(&self, namespace: &str, preset_id: &str) -> RemoteResult<Preset> {
    self.guard(&self.gets)?;
    self
      .docs
      .lock()
      .unwrap()
      .get(&(namespace.to_string(), preset_id.to_string()))
      .cloned()
      .ok_or(RemoteError::NotFound)
  }

  async fn list_recent(&self, namespace: &str, max_count: usize) -> RemoteResult<Vec<Preset>> {
    self.last_list_limit.store(max_count, Ordering::SeqCst);
    self.guard(&self.lists)?;
    let mut presets: Vec<Preset> = self
      .docs
      .lock()
      .unwrap()
      .values()
      .filter(|p| p.namespace == namespace)
      .cloned()
      .collect();
    presets.sort_by(|a, b| b.created_at.at.cmp(&a.created_at.at));
    presets.truncate(max_count);
    Ok(presets)
  }

  async fn delete(&self, namespace: &str, preset_id: &str) -> RemoteResult<()> {
    self.guard(&self.deletes)?;
    self
      .docs
      .lock()
      .unwrap()
      .remove(&(namespace.to_string(), preset_id.to_string()));
    Ok(())
  }
}

/// `ParameterHost` that records everything the store hands it.
pub struct RecordingHost {
  pub current: Parameters,
  pub applied: Mutex<Vec<Parameters>>,
  pub events: Mutex<Vec<StoreEvent>>,
}

impl RecordingHost {
  pub fn new(current: Parameters) -> Self {
    Self {
      current,
      applied: Mutex::new(Vec::new()),
      events: Mutex::new(Vec::new()),
    }
  }

  pub fn applied(&self) -> Vec<Parameters> {
    self.applied.lock().unwrap().clone()
  }

  pub fn events(&self) -> Vec<StoreEvent> {
    self.events.lock().unwrap().clone()
  }
}

impl ParameterHost for RecordingHost {
  fn current_parameters(&self) -> Parameters {
    self.current.clone()
  }

  fn apply_parameters(&self, parameters: &Parameters) {
    self.applied.lock().unwrap().push(parameters.clone());
  }

  fn notify(&self, event: &StoreEvent) {
    self.events.lock().unwrap().push(event.clone());
  }
}

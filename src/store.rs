//! Preset store that ties the remote store, local mirror and cache together.
//!
//! Reads go cache -> remote -> local mirror. Writes go to the remote store
//! and are always mirrored locally, whether or not the remote write worked.
//! The two tiers are replicated best-effort only: a delete that fails
//! remotely still succeeds locally, and nothing reconciles them later.

use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::cache::{Sourced, TtlCache, DEFAULT_TTL};
use crate::config::Config;
use crate::credential::{CredentialChecker, StaticSecret};
use crate::error::{PresetError, RemoteError, Result};
use crate::host::{ParameterHost, StoreEvent};
use crate::local::{KvBackend, LocalMirror, SqliteKv};
use crate::preset::{generate_id, validate_name, CreatedAt, Parameters, Preset, PresetDraft};
use crate::remote::{HttpRemoteStore, RemoteStore};
use crate::transfer::{ExportDocument, DEFAULT_EXPORT_NAME};

/// Remote lists return at most this many presets.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Tiered preset storage for one or more tool namespaces.
pub struct PresetStore {
  remote: Arc<dyn RemoteStore>,
  local: LocalMirror,
  cache: TtlCache,
  credentials: Arc<dyn CredentialChecker>,
  host: Option<Arc<dyn ParameterHost>>,
  current: Mutex<Option<Preset>>,
  author: String,
  tool_version: String,
  list_limit: usize,
}

impl PresetStore {
  pub fn builder(
    remote: Arc<dyn RemoteStore>,
    local: LocalMirror,
    credentials: Arc<dyn CredentialChecker>,
  ) -> PresetStoreBuilder {
    PresetStoreBuilder::new(remote, local, credentials)
  }

  /// Build a store from configuration: HTTP remote, SQLite mirror and the
  /// configured shared secret.
  pub fn from_config(config: &Config) -> color_eyre::Result<Self> {
    let remote = HttpRemoteStore::new(&config.remote)?;
    let backend: Arc<dyn KvBackend> = match &config.local.path {
      Some(path) => Arc::new(SqliteKv::open_at(path)?),
      None => Arc::new(SqliteKv::open()?),
    };
    let local = LocalMirror::new(backend).with_max_entries(config.local.max_entries);
    let credentials = StaticSecret::new(config.secret()?);

    Ok(
      Self::builder(Arc::new(remote), local, Arc::new(credentials))
        .cache_ttl(Duration::from_secs(config.cache.ttl_secs))
        .list_limit(config.remote.list_limit)
        .author(&config.author)
        .tool_version(&config.tool_version)
        .build(),
    )
  }

  /// List presets, newest first.
  pub async fn list(&self, namespace: &str, use_cache: bool) -> Vec<Preset> {
    self.list_sourced(namespace, use_cache).await.data
  }

  /// List presets and report which tier answered.
  ///
  /// A local fallback result is never cached, so the next call tries the
  /// remote store again.
  pub async fn list_sourced(&self, namespace: &str, use_cache: bool) -> Sourced<Vec<Preset>> {
    if use_cache {
      if let Some((presets, cached_at)) = self.cache.get(namespace) {
        return Sourced::from_cache(presets, cached_at);
      }
    }

    match self.remote.list_recent(namespace, self.list_limit).await {
      Ok(presets) => {
        self.cache.put(namespace, presets.clone());
        Sourced::from_network(presets)
      }
      Err(e) => {
        warn!(namespace, error = %e, "remote list failed, using local presets");
        Sourced::local_fallback(self.local.list_all(namespace))
      }
    }
  }

  /// Save a new preset.
  ///
  /// Fails only on a rejected credential or an empty name, before any I/O.
  /// A remote failure still succeeds with a client-stamped preset held only
  /// by the local mirror; see `Preset::is_degraded_write`.
  pub async fn save(
    &self,
    namespace: &str,
    name: &str,
    description: &str,
    parameters: Parameters,
    secret: &str,
  ) -> Result<Preset> {
    self.authorize(secret)?;
    let name = validate_name(name)?;

    let now = Utc::now();
    let id = generate_id(now);
    let draft = PresetDraft {
      name,
      description: description.to_string(),
      parameters,
      author: self.author.clone(),
      tool_version: self.tool_version.clone(),
    };

    let remote_result = self.remote.create(namespace, &id, &draft).await;

    let local_copy = draft
      .clone()
      .into_preset(id.clone(), namespace, CreatedAt::client(now));
    self.local.upsert_front(namespace, local_copy.clone());

    let preset = match remote_result {
      Ok(server_at) => {
        self.cache.invalidate(namespace);
        info!(namespace, preset_id = %id, "preset saved");
        draft.into_preset(id, namespace, CreatedAt::server(server_at))
      }
      Err(e) => {
        warn!(namespace, preset_id = %id, error = %e, "remote save failed, preset kept locally");
        local_copy
      }
    };

    self.set_current(Some(preset.clone()));
    self.notify(StoreEvent::Saved {
      preset: preset.clone(),
      degraded: preset.is_degraded_write(),
    });
    Ok(preset)
  }

  /// Save the host's current parameters.
  ///
  /// Without a host the preset carries no parameters.
  pub async fn save_current(
    &self,
    namespace: &str,
    name: &str,
    description: &str,
    secret: &str,
  ) -> Result<Preset> {
    let parameters = self
      .host
      .as_ref()
      .map(|host| host.current_parameters())
      .unwrap_or_default();
    self
      .save(namespace, name, description, parameters, secret)
      .await
  }

  /// Load a preset and apply it to the host.
  pub async fn load_by_id(&self, namespace: &str, preset_id: &str) -> Result<Preset> {
    Ok(self.load_by_id_sourced(namespace, preset_id).await?.data)
  }

  /// Load a preset, falling back to the local mirror on any remote failure,
  /// including a remote miss.
  pub async fn load_by_id_sourced(
    &self,
    namespace: &str,
    preset_id: &str,
  ) -> Result<Sourced<Preset>> {
    let loaded = match self.remote.get_by_id(namespace, preset_id).await {
      Ok(preset) => Sourced::from_network(preset),
      Err(e) => {
        match &e {
          RemoteError::NotFound => info!(namespace, preset_id, "preset not found remotely"),
          RemoteError::Unavailable(_) => {
            warn!(namespace, preset_id, error = %e, "remote load failed")
          }
        }
        let preset = self
          .local
          .get_by_id(namespace, preset_id)
          .ok_or_else(|| PresetError::not_found(namespace, preset_id))?;
        Sourced::local_fallback(preset)
      }
    };

    self.activate(&loaded.data);
    self.notify(StoreEvent::Loaded {
      preset: loaded.data.clone(),
      source: loaded.source,
    });
    Ok(loaded)
  }

  /// Delete a preset from both tiers.
  ///
  /// Succeeds once the credential is accepted and the local copy is gone;
  /// a failed remote delete is only logged, so the remote document may
  /// outlive the local one.
  pub async fn delete_by_id(&self, namespace: &str, preset_id: &str, secret: &str) -> Result<()> {
    self.authorize(secret)?;

    if let Err(e) = self.remote.delete(namespace, preset_id).await {
      warn!(namespace, preset_id, error = %e, "remote delete failed");
    }
    self.cache.invalidate(namespace);
    self.local.remove(namespace, preset_id);

    {
      let mut current = self.current();
      if current.as_ref().is_some_and(|p| p.id == preset_id) {
        *current = None;
      }
    }

    info!(namespace, preset_id, "preset deleted");
    self.notify(StoreEvent::Deleted {
      id: preset_id.to_string(),
    });
    Ok(())
  }

  /// Apply a uniformly random preset from the (possibly cached) list.
  ///
  /// An empty list leaves the host untouched and returns `None`.
  pub async fn initialize(&self, namespace: &str) -> Option<Preset> {
    let presets = self.list(namespace, true).await;
    let Some(preset) = presets.choose(&mut rand::rng()).cloned() else {
      info!(namespace, "no presets available for random selection");
      return None;
    };

    self.activate(&preset);
    self.notify(StoreEvent::RandomPick {
      preset: preset.clone(),
    });
    Some(preset)
  }

  /// Serialize `parameters` as an export document named after the current
  /// preset.
  pub fn export_preset(&self, namespace: &str, parameters: Parameters) -> Result<Vec<u8>> {
    let name = self
      .current_preset()
      .map(|p| p.name)
      .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string());
    ExportDocument::new(namespace, &name, parameters, Utc::now()).to_bytes()
  }

  /// Export the host's current parameters.
  pub fn export_current(&self, namespace: &str) -> Result<Vec<u8>> {
    let parameters = self
      .host
      .as_ref()
      .map(|host| host.current_parameters())
      .unwrap_or_default();
    self.export_preset(namespace, parameters)
  }

  /// Read an export document and apply its parameters to the host.
  ///
  /// The returned preset is not persisted; save it explicitly to keep it.
  pub fn import_preset(&self, namespace: &str, reader: impl Read) -> Result<Preset> {
    let doc = ExportDocument::read_for(namespace, reader)?;
    let preset = doc.into_preset(&self.author, &self.tool_version, Utc::now());

    if let Some(host) = &self.host {
      host.apply_parameters(&preset.parameters);
    }
    self.notify(StoreEvent::Imported {
      name: preset.name.clone(),
    });
    Ok(preset)
  }

  /// Last preset loaded, saved or randomly picked.
  pub fn current_preset(&self) -> Option<Preset> {
    self.current().clone()
  }

  pub fn cache(&self) -> &TtlCache {
    &self.cache
  }

  pub fn local(&self) -> &LocalMirror {
    &self.local
  }

  fn authorize(&self, secret: &str) -> Result<()> {
    if self.credentials.check(secret) {
      Ok(())
    } else {
      warn!("rejected preset write with bad credential");
      Err(PresetError::BadCredential)
    }
  }

  fn activate(&self, preset: &Preset) {
    if let Some(host) = &self.host {
      host.apply_parameters(&preset.parameters);
    }
    self.set_current(Some(preset.clone()));
  }

  fn notify(&self, event: StoreEvent) {
    if let Some(host) = &self.host {
      host.notify(&event);
    }
  }

  fn set_current(&self, preset: Option<Preset>) {
    *self.current() = preset;
  }

  fn current(&self) -> MutexGuard<'_, Option<Preset>> {
    self.current.lock().unwrap_or_else(|e| e.into_inner())
  }
}

/// Assembles a `PresetStore` from injected tiers.
pub struct PresetStoreBuilder {
  remote: Arc<dyn RemoteStore>,
  local: LocalMirror,
  credentials: Arc<dyn CredentialChecker>,
  host: Option<Arc<dyn ParameterHost>>,
  cache_ttl: Duration,
  list_limit: usize,
  author: String,
  tool_version: String,
}

impl PresetStoreBuilder {
  pub fn new(
    remote: Arc<dyn RemoteStore>,
    local: LocalMirror,
    credentials: Arc<dyn CredentialChecker>,
  ) -> Self {
    Self {
      remote,
      local,
      credentials,
      host: None,
      cache_ttl: DEFAULT_TTL,
      list_limit: DEFAULT_LIST_LIMIT,
      author: "YS Studio".to_string(),
      tool_version: "1.0.0".to_string(),
    }
  }

  pub fn host(mut self, host: Arc<dyn ParameterHost>) -> Self {
    self.host = Some(host);
    self
  }

  pub fn cache_ttl(mut self, ttl: Duration) -> Self {
    self.cache_ttl = ttl;
    self
  }

  pub fn list_limit(mut self, limit: usize) -> Self {
    self.list_limit = limit;
    self
  }

  pub fn author(mut self, author: &str) -> Self {
    self.author = author.to_string();
    self
  }

  pub fn tool_version(mut self, tool_version: &str) -> Self {
    self.tool_version = tool_version.to_string();
    self
  }

  pub fn build(self) -> PresetStore {
    PresetStore {
      remote: self.remote,
      local: self.local,
      cache: TtlCache::with_ttl(self.cache_ttl),
      credentials: self.credentials,
      host: self.host,
      current: Mutex::new(None),
      author: self.author,
      tool_version: self.tool_version,
      list_limit: self.list_limit,
    }
  }
}

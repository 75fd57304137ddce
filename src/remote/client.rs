//! Remote store contract and its HTTP document-API adapter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use reqwest::{
  header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
  Client, Response, StatusCode,
};
use tracing::debug;
use url::Url;

use super::api_types::{ApiListResponse, ApiPresetDocument, ApiPresetWrite};
use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::preset::{Preset, PresetDraft};

/// Hosted, schemaless document store partitioned by namespace.
///
/// Implementations make exactly one attempt per call; retry policy belongs
/// to whoever wraps them.
#[async_trait]
pub trait RemoteStore: Send + Sync {
  /// Write `draft` under `(namespace, preset_id)`, overwriting any existing
  /// document. Returns the server-assigned creation time.
  async fn create(
    &self,
    namespace: &str,
    preset_id: &str,
    draft: &PresetDraft,
  ) -> RemoteResult<DateTime<Utc>>;

  async fn get_by_id(
    &self,
    namespace: &str,
    preset_id: &str,
  ) -> RemoteResult<Preset>;

  /// Up to `max_count` presets, newest first by server timestamp.
  async fn list_recent(
    &self,
    namespace: &str,
    max_count: usize,
  ) -> RemoteResult<Vec<Preset>>;

  async fn delete(&self, namespace: &str, preset_id: &str) -> RemoteResult<()>;
}

/// `RemoteStore` over a REST document API laid out as
/// `{base}/presets/{namespace}/items/{id}`.
#[derive(Clone)]
pub struct HttpRemoteStore {
  client: Client,
  base: Url,
}

impl HttpRemoteStore {
  pub fn new(config: &RemoteConfig) -> color_eyre::Result<Self> {
    let base =
      Url::parse(&config.url).map_err(|e| eyre!("Invalid remote url {}: {}", config.url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("Remote url {} cannot be used as a base", config.url));
    }

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = &config.api_key {
      headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", key))
          .map_err(|e| eyre!("Invalid api key header: {}", e))?,
      );
    }

    let client = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self { client, base })
  }

  fn items_url(&self, namespace: &str, preset_id: Option<&str>) -> RemoteResult<Url> {
    let mut url = self.base.clone();
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| RemoteError::Unavailable(format!("invalid base url {}", self.base)))?;
      segments.pop_if_empty().extend(["presets", namespace, "items"]);
      if let Some(id) = preset_id {
        segments.push(id);
      }
    }
    Ok(url)
  }
}

/// Map a non-success status onto the remote error taxonomy.
async fn check_response(response: Response) -> RemoteResult<Response> {
  let status = response.status();
  if status == StatusCode::NOT_FOUND {
    return Err(RemoteError::NotFound);
  }
  if !status.is_success() {
    let body = response.text().await.unwrap_or_default();
    return Err(RemoteError::Unavailable(format!("HTTP {}: {}", status, body)));
  }
  Ok(response)
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
  async fn create(
    &self,
    namespace: &str,
    preset_id: &str,
    draft: &PresetDraft,
  ) -> RemoteResult<DateTime<Utc>> {
    let url = self.items_url(namespace, Some(preset_id))?;
    debug!(%url, "creating remote preset");

    let response = self
      .client
      .put(url)
      .json(&ApiPresetWrite::from(draft))
      .send()
      .await?;

    let stored: ApiPresetDocument = check_response(response).await?.json().await?;
    Ok(stored.created_at)
  }

  async fn get_by_id(
    &self,
    namespace: &str,
    preset_id: &str,
  ) -> RemoteResult<Preset> {
    let url = self.items_url(namespace, Some(preset_id))?;
    debug!(%url, "fetching remote preset");

    let response = self.client.get(url).send().await?;
    let doc: ApiPresetDocument = check_response(response).await?.json().await?;
    Ok(doc.into_preset(namespace))
  }

  async fn list_recent(
    &self,
    namespace: &str,
    max_count: usize,
  ) -> RemoteResult<Vec<Preset>> {
    let url = self.items_url(namespace, None)?;
    debug!(%url, max_count, "listing remote presets");

    let limit = max_count.to_string();
    let response = self
      .client
      .get(url)
      .query(&[
        ("orderBy", "createdAt"),
        ("direction", "desc"),
        ("limit", limit.as_str()),
      ])
      .send()
      .await?;

    let list: ApiListResponse = check_response(response).await?.json().await?;

    let mut presets: Vec<Preset> = list
      .documents
      .into_iter()
      .map(|doc| doc.into_preset(namespace))
      .collect();
    // Don't trust the server to honor ordering or the limit
    presets.sort_by(|a, b| b.created_at.at.cmp(&a.created_at.at));
    presets.truncate(max_count);

    Ok(presets)
  }

  async fn delete(&self, namespace: &str, preset_id: &str) -> RemoteResult<()> {
    let url = self.items_url(namespace, Some(preset_id))?;
    debug!(%url, "deleting remote preset");

    let response = self.client.delete(url).send().await?;
    match check_response(response).await {
      Ok(_) | Err(RemoteError::NotFound) => Ok(()),
      Err(e) => Err(e),
    }
  }
}

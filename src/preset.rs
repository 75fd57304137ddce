//! Preset records and the pieces used to build them.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PresetError, Result};

/// Tool-specific configuration carried by a preset. Never interpreted here.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Which clock produced a `created_at` value.
///
/// Remote and local timestamps come from different clocks, so presets from
/// different tiers must not be ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampOrigin {
  ServerAssigned,
  ClientAssigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAt {
  pub at: DateTime<Utc>,
  pub origin: TimestampOrigin,
}

impl CreatedAt {
  pub fn server(at: DateTime<Utc>) -> Self {
    Self {
      at,
      origin: TimestampOrigin::ServerAssigned,
    }
  }

  pub fn client(at: DateTime<Utc>) -> Self {
    Self {
      at,
      origin: TimestampOrigin::ClientAssigned,
    }
  }
}

/// A named, immutable parameter set owned by one tool namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
  pub id: String,
  pub namespace: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub parameters: Parameters,
  pub author: String,
  pub created_at: CreatedAt,
  pub tool_version: String,
}

impl Preset {
  /// True when this preset came back from a save whose remote write failed.
  pub fn is_degraded_write(&self) -> bool {
    self.created_at.origin == TimestampOrigin::ClientAssigned
  }
}

/// The writer-supplied part of a preset, before an id and timestamp exist.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDraft {
  pub name: String,
  pub description: String,
  pub parameters: Parameters,
  pub author: String,
  pub tool_version: String,
}

impl PresetDraft {
  pub fn into_preset(self, id: String, namespace: &str, created_at: CreatedAt) -> Preset {
    Preset {
      id,
      namespace: namespace.to_string(),
      name: self.name,
      description: self.description,
      parameters: self.parameters,
      author: self.author,
      created_at,
      tool_version: self.tool_version,
    }
  }
}

/// Trim a preset name, rejecting empty or whitespace-only input.
pub fn validate_name(name: &str) -> Result<String> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(PresetError::InvalidName);
  }
  Ok(trimmed.to_string())
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generate a preset id of the form `preset_{unix_millis}_{random base36}`.
pub fn generate_id(now: DateTime<Utc>) -> String {
  let mut rng = rand::rng();
  let suffix: String = (0..ID_SUFFIX_LEN)
    .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
    .collect();
  format!("preset_{}_{}", now.timestamp_millis(), suffix)
}

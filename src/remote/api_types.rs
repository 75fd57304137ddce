//! Wire types for the preset document API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::preset::{CreatedAt, Parameters, Preset, PresetDraft};

/// Body of a create request. `createdAt` is left to the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPresetWrite<'a> {
  pub name: &'a str,
  pub description: &'a str,
  pub parameters: &'a Parameters,
  pub author: &'a str,
  pub tool_version: &'a str,
}

impl<'a> From<&'a PresetDraft> for ApiPresetWrite<'a> {
  fn from(draft: &'a PresetDraft) -> Self {
    Self {
      name: &draft.name,
      description: &draft.description,
      parameters: &draft.parameters,
      author: &draft.author,
      tool_version: &draft.tool_version,
    }
  }
}

/// A stored document as returned by the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPresetDocument {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub parameters: Parameters,
  #[serde(default)]
  pub author: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub tool_version: String,
}

impl ApiPresetDocument {
  pub fn into_preset(self, namespace: &str) -> Preset {
    Preset {
      id: self.id,
      namespace: namespace.to_string(),
      name: self.name,
      description: self.description,
      parameters: self.parameters,
      author: self.author,
      created_at: CreatedAt::server(self.created_at),
      tool_version: self.tool_version,
    }
  }
}

/// Response of a list query.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiListResponse {
  #[serde(default)]
  pub documents: Vec<ApiPresetDocument>,
}

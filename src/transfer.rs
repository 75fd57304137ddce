//! Self-describing JSON documents for moving presets between installs.

use std::io::Read;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PresetError, Result};
use crate::preset::{generate_id, CreatedAt, Parameters, Preset};

/// Name used when exporting without a current preset.
pub const DEFAULT_EXPORT_NAME: &str = "Exported Preset";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
  /// Namespace of the tool that produced the document
  pub tool: String,
  pub name: String,
  #[serde(default)]
  pub parameters: Parameters,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub export_date: Option<DateTime<Utc>>,
}

impl ExportDocument {
  pub fn new(namespace: &str, name: &str, parameters: Parameters, now: DateTime<Utc>) -> Self {
    Self {
      tool: namespace.to_string(),
      name: name.to_string(),
      parameters,
      export_date: Some(now),
    }
  }

  /// Pretty-printed JSON bytes.
  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(self)?)
  }

  /// Parse a document and check that it belongs to `namespace`.
  pub fn read_for(namespace: &str, reader: impl Read) -> Result<Self> {
    let doc: ExportDocument = serde_json::from_reader(reader)?;
    if doc.tool != namespace {
      return Err(PresetError::WrongTool {
        expected: namespace.to_string(),
        found: doc.tool,
      });
    }
    Ok(doc)
  }

  /// Unsaved preset carrying this document's name and parameters.
  pub fn into_preset(self, author: &str, tool_version: &str, now: DateTime<Utc>) -> Preset {
    Preset {
      id: generate_id(now),
      namespace: self.tool,
      name: self.name,
      description: String::new(),
      parameters: self.parameters,
      author: author.to_string(),
      created_at: CreatedAt::client(self.export_date.unwrap_or(now)),
      tool_version: tool_version.to_string(),
    }
  }
}

/// Suggested file name, e.g. `synth-x_preset_1700000000000.json`.
pub fn export_file_name(namespace: &str, now: DateTime<Utc>) -> String {
  format!("{}_preset_{}.json", namespace, now.timestamp_millis())
}

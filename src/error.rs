//! Error types for preset operations.
//!
//! Credential and validation failures are always surfaced. Transport failures
//! are mostly absorbed by `PresetStore` into a local fallback.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresetError {
  #[error("Invalid password. Please use the correct password to modify presets.")]
  BadCredential,

  #[error("Please provide a preset name")]
  InvalidName,

  #[error("Preset not found: {namespace}/{id}")]
  NotFound { namespace: String, id: String },

  #[error("Remote preset store unavailable: {0}")]
  RemoteUnavailable(String),

  #[error("This preset is for {found}, not {expected}")]
  WrongTool { expected: String, found: String },

  #[error("Failed to parse preset document: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("Local preset storage is corrupt: {0}")]
  LocalStorageCorrupt(String),
}

pub type Result<T> = std::result::Result<T, PresetError>;

/// Failure reported by a `RemoteStore` adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
  #[error("document not found")]
  NotFound,

  #[error("{0}")]
  Unavailable(String),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

impl From<reqwest::Error> for RemoteError {
  fn from(err: reqwest::Error) -> Self {
    RemoteError::Unavailable(err.to_string())
  }
}

impl RemoteError {
  /// Contract error for a failed remote call on `namespace/id`.
  ///
  /// `PresetStore` absorbs these into its local fallback; callers that drive
  /// a `RemoteStore` directly use this to report in the same taxonomy.
  pub fn into_preset_error(self, namespace: &str, id: &str) -> PresetError {
    match self {
      RemoteError::NotFound => PresetError::not_found(namespace, id),
      RemoteError::Unavailable(msg) => PresetError::RemoteUnavailable(msg),
    }
  }
}

impl PresetError {
  pub(crate) fn not_found(namespace: &str, id: &str) -> Self {
    PresetError::NotFound {
      namespace: namespace.to_string(),
      id: id.to_string(),
    }
  }
}

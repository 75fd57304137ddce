use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the shared save/delete secret.
pub const SECRET_ENV: &str = "PRESET_STORE_SECRET";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub remote: RemoteConfig,
  #[serde(default)]
  pub local: LocalConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Author stamped onto saved presets
  #[serde(default = "default_author")]
  pub author: String,
  /// Version tag stamped onto saved presets
  #[serde(default = "default_tool_version")]
  pub tool_version: String,
  /// Shared secret for save/delete; overridden by PRESET_STORE_SECRET
  pub secret: Option<String>,
  #[serde(default)]
  pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
  /// Base url of the document API
  pub url: String,
  /// Sent as a bearer token when present
  pub api_key: Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Maximum presets returned by a list query
  #[serde(default = "default_list_limit")]
  pub list_limit: usize,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      url: String::new(),
      api_key: None,
      timeout_secs: default_timeout_secs(),
      list_limit: default_list_limit(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
  /// SQLite file for the local mirror (defaults to the user data dir)
  pub path: Option<PathBuf>,
  #[serde(default = "default_max_entries")]
  pub max_entries: usize,
}

impl Default for LocalConfig {
  fn default() -> Self {
    Self {
      path: None,
      max_entries: default_max_entries(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  #[serde(default = "default_ttl_secs")]
  pub ttl_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      ttl_secs: default_ttl_secs(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  /// Filter directive used when RUST_LOG is unset
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Write daily-rotated log files here instead of stderr
  pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      directory: None,
    }
  }
}

fn default_author() -> String {
  "YS Studio".to_string()
}

fn default_tool_version() -> String {
  "1.0.0".to_string()
}

fn default_timeout_secs() -> u64 {
  10
}

fn default_list_limit() -> usize {
  100
}

fn default_max_entries() -> usize {
  50
}

fn default_ttl_secs() -> u64 {
  300
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./preset-store.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/preset-store/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/preset-store/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("preset-store.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("preset-store").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    Ok(config)
  }

  /// Get the shared secret for save and delete.
  ///
  /// Checks PRESET_STORE_SECRET first, then the `secret` config key.
  pub fn secret(&self) -> Result<String> {
    std::env::var(SECRET_ENV)
      .ok()
      .or_else(|| self.secret.clone())
      .ok_or_else(|| {
        eyre!(
          "Preset secret not found. Set {} or the `secret` config key.",
          SECRET_ENV
        )
      })
  }
}

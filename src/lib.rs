//! Named parameter presets for tools, stored in a remote document database
//! with an on-device backup.
//!
//! `PresetStore` is the entry point. Reads are served from a short-lived
//! in-memory cache, then the remote store, then the local mirror when the
//! remote store is unreachable. Writes go to the remote store and are always
//! mirrored locally.

pub mod cache;
pub mod config;
pub mod credential;
pub mod error;
pub mod host;
pub mod local;
pub mod logging;
pub mod preset;
pub mod remote;
pub mod store;
pub mod transfer;

#[cfg(test)]
mod test_utils;

pub use cache::{CacheSource, Sourced, TtlCache};
pub use config::Config;
pub use credential::{CredentialChecker, StaticSecret};
pub use error::{PresetError, RemoteError, Result};
pub use host::{ParameterHost, StoreEvent};
pub use local::{KvBackend, LocalMirror, MemoryKv, SqliteKv};
pub use preset::{CreatedAt, Parameters, Preset, PresetDraft, TimestampOrigin};
pub use remote::{HttpRemoteStore, RemoteStore};
pub use store::{PresetStore, PresetStoreBuilder};
pub use transfer::{export_file_name, ExportDocument};

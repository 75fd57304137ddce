//! On-device backup of presets.
//!
//! `LocalMirror` keeps a bounded, most-recent-first list per namespace on top
//! of any byte-string key/value backend. It never fails towards its caller:
//! unreadable storage reads as empty and failed writes are logged.

mod backend;
mod mirror;

pub use backend::{KvBackend, MemoryKv, SqliteKv};
pub use mirror::{LocalMirror, DEFAULT_MAX_ENTRIES};

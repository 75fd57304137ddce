//! In-memory list cache and read provenance.
//!
//! The cache holds one list snapshot per namespace and expires it a fixed
//! time after population. There is no partial invalidation: a write to a
//! namespace drops the whole snapshot.

mod traits;
mod ttl;

pub use traits::{CacheSource, Sourced};
pub use ttl::{TtlCache, DEFAULT_TTL};

//! Remote document store holding the authoritative copy of each preset.

mod api_types;
mod client;

pub use client::{HttpRemoteStore, RemoteStore};

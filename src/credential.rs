//! Authorization gate for writes.
//!
//! Save and delete are allowed only for callers presenting a credential the
//! checker accepts. `StaticSecret` is a single shared password; a host can
//! plug in per-user tokens by implementing `CredentialChecker` instead.

use sha2::{Digest, Sha256};

pub trait CredentialChecker: Send + Sync {
  /// True when `supplied` authorizes a write.
  fn check(&self, supplied: &str) -> bool;
}

impl<F> CredentialChecker for F
where
  F: Fn(&str) -> bool + Send + Sync,
{
  fn check(&self, supplied: &str) -> bool {
    self(supplied)
  }
}

/// One shared secret for every writer.
///
/// Only the SHA-256 digest is kept, and digests are compared without an early
/// exit. There is no rate limiting.
pub struct StaticSecret {
  digest: [u8; 32],
}

impl StaticSecret {
  pub fn new(secret: impl AsRef<str>) -> Self {
    Self {
      digest: digest(secret.as_ref()),
    }
  }
}

impl std::fmt::Debug for StaticSecret {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StaticSecret").finish_non_exhaustive()
  }
}

impl CredentialChecker for StaticSecret {
  fn check(&self, supplied: &str) -> bool {
    let supplied = digest(supplied);
    self
      .digest
      .iter()
      .zip(supplied.iter())
      .fold(0u8, |acc, (a, b)| acc | (a ^ b))
      == 0
  }
}

fn digest(value: &str) -> [u8; 32] {
  Sha256::digest(value.as_bytes()).into()
}

//! Contract with the application that owns the parameters.
//!
//! The store never renders anything. It reads and applies parameters through
//! `ParameterHost` and reports outcomes as `StoreEvent`s; turning those into
//! notifications, dropdown updates or modals is up to the host.

use crate::cache::CacheSource;
use crate::preset::{Parameters, Preset};

pub trait ParameterHost: Send + Sync {
  /// Snapshot of the tool's current parameters.
  fn current_parameters(&self) -> Parameters;

  /// Replace the tool's parameters with a loaded preset's.
  fn apply_parameters(&self, parameters: &Parameters);

  fn notify(&self, _event: &StoreEvent) {}
}

/// Something the host may want to tell its user about.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
  Loaded { preset: Preset, source: CacheSource },
  /// `degraded` means only the local backup holds the preset
  Saved { preset: Preset, degraded: bool },
  Deleted { id: String },
  Imported { name: String },
  RandomPick { preset: Preset },
}

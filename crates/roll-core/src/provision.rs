//! Code provisioning: minting a participant's token and rendering its image.

use std::path::PathBuf;

use serde::Serialize;

use crate::{Result, participant::ParticipantId};

/// Outcome of sweeping the artifact directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
  pub removed: usize,
  /// Paths that could not be removed.
  pub failed:  Vec<PathBuf>,
}

impl PurgeReport {
  pub fn is_clean(&self) -> bool { self.failed.is_empty() }
}

/// Renders scannable artifacts for participants.
///
/// Synchronous and object safe; callers on an async runtime should run it on
/// the blocking pool.
pub trait CodeProvisioner: Send + Sync {
  /// Render the token for `id` into a new artifact and return its path.
  ///
  /// Every call produces a fresh file name, so re-provisioning never
  /// overwrites an earlier artifact.
  fn provision(&self, id: ParticipantId) -> Result<String>;

  /// Remove every artifact this provisioner has written.
  fn purge(&self) -> Result<PurgeReport>;
}

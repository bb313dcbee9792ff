//! QR-code rendering for participant tokens.

use std::{fs, io, path::PathBuf};

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use roll_core::{
  Error, Result,
  participant::ParticipantId,
  provision::{CodeProvisioner, PurgeReport},
  token,
};
use uuid::Uuid;

/// Edge length of one QR module, in pixels.
const MODULE_PX: u32 = 10;

/// Writes one PNG per provisioning into a single directory.
#[derive(Debug, Clone)]
pub struct QrProvisioner {
  dir: PathBuf,
}

impl QrProvisioner {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }
}

impl CodeProvisioner for QrProvisioner {
  fn provision(&self, id: ParticipantId) -> Result<String> {
    let code = QrCode::with_error_correction_level(token::encode(id), EcLevel::L)
      .map_err(|e| Error::Provision(e.to_string()))?;

    // The renderer adds the standard four-module quiet zone.
    let image = code
      .render::<Luma<u8>>()
      .quiet_zone(true)
      .module_dimensions(MODULE_PX, MODULE_PX)
      .build();

    fs::create_dir_all(&self.dir)?;
    let suffix = Uuid::new_v4().simple().to_string();
    let path = self.dir.join(format!("qr_{id}_{}.png", &suffix[..8]));

    image
      .save_with_format(&path, ImageFormat::Png)
      .map_err(|e| Error::Provision(format!("{}: {e}", path.display())))?;

    Ok(path.to_string_lossy().replace('\\', "/"))
  }

  fn purge(&self) -> Result<PurgeReport> {
    let entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PurgeReport::default()),
      Err(e) => return Err(e.into()),
    };

    let mut report = PurgeReport::default();
    for entry in entries {
      let entry = entry?;
      if !entry.file_type()?.is_file() {
        continue;
      }
      let path = entry.path();
      match fs::remove_file(&path) {
        Ok(()) => report.removed += 1,
        Err(e) => {
          tracing::warn!(path = %path.display(), error = %e, "could not remove code image");
          report.failed.push(path);
        }
      }
    }

    Ok(report)
  }
}

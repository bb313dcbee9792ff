//! `POST /reset-system`

use axum::{Json, extract::State};
use roll_core::store::RegistryStore;

use crate::{AppState, error::Result, handlers::Outcome};

/// Wipe participants, attendance, and code images.
///
/// Images that survive the sweep make the reply unsuccessful even though the
/// database has already been cleared.
pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Json<Outcome>>
where
  S: RegistryStore + 'static,
{
  let report = state.registry.reset().await?;

  let outcome = match report.artifacts_left {
    0 => Outcome::ok("System reset successfully"),
    left => Outcome::failed(format!(
      "System data cleared, but {left} code images could not be removed"
    )),
  };
  Ok(Json(outcome))
}

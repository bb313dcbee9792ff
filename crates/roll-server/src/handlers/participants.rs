//! `GET /participants`

use axum::{Json, extract::State};
use roll_core::{participant::Participant, store::RegistryStore};

use crate::{AppState, error::Result};

/// All participants, ascending id.
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Participant>>>
where
  S: RegistryStore + 'static,
{
  Ok(Json(state.registry.participants().await?))
}

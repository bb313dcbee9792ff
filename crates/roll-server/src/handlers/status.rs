//! Handlers for the dashboard summary and `/config-check`.

use axum::{Json, extract::State};
use roll_core::store::RegistryStore;
use serde::Serialize;

use crate::{AppState, config::ConfigStatus, error::Result};

#[derive(Debug, Serialize)]
pub struct Summary {
  pub participant_count: u64,
  pub attendance_count:  u64,
}

/// `GET /`
pub async fn summary<S>(State(state): State<AppState<S>>) -> Result<Json<Summary>>
where
  S: RegistryStore + 'static,
{
  let counts = state.registry.stats().await?;
  Ok(Json(Summary {
    participant_count: counts.participants,
    attendance_count:  counts.attendance,
  }))
}

/// `GET /config-check` reports which mail settings are present.
pub async fn config_check<S>(State(state): State<AppState<S>>) -> Json<ConfigStatus>
where
  S: RegistryStore + 'static,
{
  Json(state.config.status())
}

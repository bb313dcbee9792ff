//! HTTP surface for the Roll attendance registry.
//!
//! Exposes an axum [`Router`] backed by any [`RegistryStore`]. The binary in
//! `main.rs` wires it to SQLite, the QR renderer, and SMTP; tests wire it to
//! an in-memory store and fake collaborators.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roll_server::router(AppState::new(registry, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod provision;
pub mod registry;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use mailer::SmtpMailer;
pub use provision::QrProvisioner;
pub use registry::Registry;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use roll_core::store::RegistryStore;
use tower_http::{services::ServeDir, trace::TraceLayer};

use handlers::{attendance, notify, participants, reset, scan, status, upload};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub registry: Arc<Registry<S>>,
  pub config:   Arc<ServerConfig>,
}

impl<S> AppState<S> {
  pub fn new(registry: Registry<S>, config: ServerConfig) -> Self {
    Self { registry: Arc::new(registry), config: Arc::new(config) }
  }
}

// Manual impl: the store itself need not be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      registry: Arc::clone(&self.registry),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router, including static code images under
/// `/codes`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RegistryStore + 'static,
{
  let codes = ServeDir::new(&state.config.code_dir);
  let body_limit = state.config.max_upload_bytes;

  Router::new()
    .route("/",                    get(status::summary::<S>))
    .route("/config-check",        get(status::config_check::<S>))
    .route("/upload",              post(upload::handler::<S>))
    .route("/participants",        get(participants::list::<S>))
    .route("/send-emails",         post(notify::handler::<S>))
    .route("/scan-qr",             post(scan::handler::<S>))
    .route("/attendance",          get(attendance::list::<S>))
    .route("/download-attendance", get(attendance::download::<S>))
    .route("/reset-system",        post(reset::handler::<S>))
    .nest_service("/codes", codes)
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

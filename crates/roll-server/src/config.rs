//! Runtime configuration.
//!
//! Built once at startup from defaults, an optional TOML file, and `ROLL_*`
//! environment variables, then shared read-only through [`crate::AppState`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Server configuration, deserialised from `config.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  /// SQLite database file.
  pub store_path:        PathBuf,
  /// Scratch space for uploaded rosters and generated reports.
  pub upload_dir:        PathBuf,
  /// Where rendered code images are written and served from.
  pub code_dir:          PathBuf,
  pub max_upload_bytes:  usize,
  pub smtp_host:         String,
  pub smtp_port:         u16,
  pub smtp_username:     Option<String>,
  pub smtp_password:     Option<String>,
  /// Sender mailbox; defaults to `smtp_username`.
  pub smtp_from:         Option<String>,
  pub smtp_timeout_secs: u64,
}

/// Everything the SMTP mailer needs. Only exists when credentials are set.
#[derive(Debug, Clone)]
pub struct MailSettings {
  pub host:     String,
  pub port:     u16,
  pub username: String,
  pub password: String,
  pub from:     String,
  pub timeout:  Duration,
}

/// Diagnostic view for `/config-check`. Never carries the secret itself.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigStatus {
  pub smtp_username_configured: bool,
  pub smtp_password_configured: bool,
  pub smtp_host:                String,
  pub smtp_port:                u16,
  pub ready:                    bool,
}

impl ServerConfig {
  /// Load configuration; `path` may point to a file that does not exist.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let cfg: Self = Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 5000_i64)?
      .set_default("store_path", "attendance.db")?
      .set_default("upload_dir", "uploads")?
      .set_default("code_dir", "static/qr_codes")?
      .set_default("max_upload_bytes", 16_i64 * 1024 * 1024)?
      .set_default("smtp_host", "smtp.gmail.com")?
      .set_default("smtp_port", 587_i64)?
      .set_default("smtp_timeout_secs", 30_i64)?
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix("ROLL"))
      .build()?
      .try_deserialize()?;

    Ok(cfg.with_expanded_paths())
  }

  fn with_expanded_paths(mut self) -> Self {
    self.store_path = expand_tilde(&self.store_path);
    self.upload_dir = expand_tilde(&self.upload_dir);
    self.code_dir = expand_tilde(&self.code_dir);
    self
  }

  /// `host:port` for the listener.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Mail transport settings, if both username and password are present.
  pub fn mail_settings(&self) -> Option<MailSettings> {
    let username = non_empty(&self.smtp_username)?;
    let password = non_empty(&self.smtp_password)?;

    Some(MailSettings {
      host:     self.smtp_host.clone(),
      port:     self.smtp_port,
      username: username.to_owned(),
      password: password.to_owned(),
      from:     non_empty(&self.smtp_from).unwrap_or(username).to_owned(),
      timeout:  Duration::from_secs(self.smtp_timeout_secs),
    })
  }

  pub fn status(&self) -> ConfigStatus {
    let username = non_empty(&self.smtp_username).is_some();
    let password = non_empty(&self.smtp_password).is_some();
    ConfigStatus {
      smtp_username_configured: username,
      smtp_password_configured: password,
      smtp_host:                self.smtp_host.clone(),
      smtp_port:                self.smtp_port,
      ready:                    username && password,
    }
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.max_upload_bytes, 16 * 1024 * 1024);
    assert_eq!(cfg.code_dir, PathBuf::from("static/qr_codes"));
    assert_eq!(cfg.smtp_host, "smtp.gmail.com");
    assert_eq!(cfg.smtp_port, 587);
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      r#"
port          = 8080
store_path    = "/var/lib/roll/roll.db"
smtp_username = "events@example.com"
smtp_password = "app-password"
"#,
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/roll/roll.db"));

    let mail = cfg.mail_settings().unwrap();
    assert_eq!(mail.username, "events@example.com");
    assert_eq!(mail.from, "events@example.com");
    assert_eq!(mail.timeout, Duration::from_secs(30));
    assert!(cfg.status().ready);
  }

  #[test]
  fn mail_requires_both_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();

    cfg.smtp_username = Some("events@example.com".into());
    cfg.smtp_password = Some("   ".into());
    assert!(cfg.mail_settings().is_none());

    let status = cfg.status();
    assert!(status.smtp_username_configured);
    assert!(!status.smtp_password_configured);
    assert!(!status.ready);
  }

  #[test]
  fn explicit_sender_wins() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    cfg.smtp_username = Some("login".into());
    cfg.smtp_password = Some("secret".into());
    cfg.smtp_from = Some("Event Team <events@example.com>".into());

    assert_eq!(cfg.mail_settings().unwrap().from, "Event Team <events@example.com>");
  }
}

use crate::auth::OwnershipPolicy;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration complète, chaque section a ses valeurs par défaut.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub birthday: BirthdayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub pages: PagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BirthdayConfig {
    #[serde(default = "default_paginate_by")]
    pub paginate_by: usize,
    #[serde(default)]
    pub ownership: OwnershipPolicy,
}

impl Default for BirthdayConfig {
    fn default() -> Self {
        Self {
            paginate_by: default_paginate_by(),
            ownership: OwnershipPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { login_url: default_login_url() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    #[serde(default = "default_email_path")]
    pub file_path: PathBuf,
    #[serde(default = "default_admin")]
    pub admin: String,
    #[serde(default = "default_from")]
    pub from: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            file_path: default_email_path(),
            admin: default_admin(),
            from: default_from(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self { root: default_media_root() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagesConfig {
    #[serde(default = "default_pages_dir")]
    pub dir: PathBuf,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self { dir: default_pages_dir() }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("db.json")
}
fn default_paginate_by() -> usize {
    10
}
fn default_login_url() -> String {
    "/auth/login/".to_string()
}
fn default_email_path() -> PathBuf {
    PathBuf::from("sent_emails")
}
fn default_admin() -> String {
    "admin@acme.not".to_string()
}
fn default_from() -> String {
    "birthday_form@acme.not".to_string()
}
fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}
fn default_pages_dir() -> PathBuf {
    PathBuf::from("pages")
}

impl Settings {
    pub fn from_toml(raw: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(raw).context("parsing settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Charge un fichier TOML ; un fichier absent donne la configuration par défaut.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("loading {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.birthday.paginate_by == 0 {
            bail!("birthday.paginate_by must be > 0");
        }
        if self.auth.login_url.trim().is_empty() {
            bail!("auth.login_url cannot be empty");
        }
        Ok(())
    }
}

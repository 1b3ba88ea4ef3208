use std::path::PathBuf;

use anyhow::{Context, bail};

use xhub_core::hub::DEFAULT_MAIL_SUBJECT;

/// Admin secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["admin_key_123", "change-me"];

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub admin_secret: String,
    pub mail_subject: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let admin_secret = var("XHUB_ADMIN_SECRET").unwrap_or_default();
        if admin_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&admin_secret.as_str()) {
            bail!("XHUB_ADMIN_SECRET is unset or still a placeholder; the delivery agent must share it");
        }

        let port = var("XHUB_PORT")
            .unwrap_or_else(|| "7860".into())
            .parse()
            .context("XHUB_PORT must be a port number")?;

        Ok(Self {
            host: var("XHUB_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("XHUB_DB_PATH").unwrap_or_else(|| "xhub.db".into()).into(),
            admin_secret,
            mail_subject: var("XHUB_MAIL_SUBJECT").unwrap_or_else(|| DEFAULT_MAIL_SUBJECT.into()),
        })
    }
}

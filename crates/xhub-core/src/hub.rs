use std::sync::Arc;

use argon2::Params;
use tracing::warn;

use crate::error::{HubError, Result};
use crate::store::Store;

pub const DEFAULT_MAIL_SUBJECT: &str = "XHUB Code";

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Shared credential of the delivery agent, compared by exact equality.
    pub admin_secret: String,
    pub mail_subject: String,
    /// Argon2id cost used for new password hashes.
    pub password_params: Params,
}

impl HubConfig {
    pub fn new(admin_secret: impl Into<String>) -> Self {
        Self {
            admin_secret: admin_secret.into(),
            mail_subject: DEFAULT_MAIL_SUBJECT.to_string(),
            password_params: Params::default(),
        }
    }
}

/// Entry point for every core operation. Cheap to clone.
#[derive(Clone)]
pub struct Hub {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) config: Arc<HubConfig>,
}

impl Hub {
    pub fn new(store: Arc<dyn Store>, config: HubConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Resolve a bearer token or fail with `Unauthorized`.
    pub(crate) fn authenticate(&self, token: &str) -> Result<String> {
        self.resolve(token)?.ok_or(HubError::Unauthorized)
    }

    /// An empty configured secret never matches.
    pub(crate) fn authorize_admin(&self, key: &str) -> Result<()> {
        if self.config.admin_secret.is_empty() || key != self.config.admin_secret {
            warn!("Rejected delivery agent call with a bad admin key");
            return Err(HubError::Forbidden);
        }
        Ok(())
    }

    /// The account must exist and be verified.
    pub(crate) fn require_account(&self, username: &str) -> Result<()> {
        match self.store.account_by_username(username)? {
            Some(creds) if creds.account.verified => Ok(()),
            _ => Err(HubError::NotFound(format!("User '{username}'"))),
        }
    }
}

use rand::Rng;
use tracing::info;
use uuid::Uuid;

use xhub_types::models::{DeliveryStatus, DeliveryTask, PendingVerification};
use xhub_types::validate;

use crate::error::{HubError, Result};
use crate::hub::Hub;
use crate::store::{ConfirmOutcome, NewRegistration, RegistrationOutcome};

impl Hub {
    /// Reserve `username`/`email`, issue a fresh 6-digit code and queue its
    /// delivery. Repeating the request for the same unverified pair replaces
    /// the code and the undelivered task; any other overlap is a conflict.
    pub fn request_registration(&self, username: &str, password: &str, email: &str) -> Result<()> {
        let code = generate_code();
        let reg = NewRegistration {
            account_id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.hash_password(password)?,
            task_id: Uuid::new_v4().to_string(),
            subject: self.config.mail_subject.clone(),
            body: format!("Code: {code}"),
            code,
        };

        match self.store.request_registration(&reg)? {
            RegistrationOutcome::Created => {
                info!(username, "Registration queued");
                Ok(())
            }
            RegistrationOutcome::Superseded { stale_tasks } => {
                info!(username, stale_tasks, "Registration re-queued, previous code superseded");
                Ok(())
            }
            RegistrationOutcome::UsernameTaken => Err(HubError::Conflict("Username taken".into())),
            RegistrationOutcome::EmailTaken => Err(HubError::Conflict("Email already used".into())),
        }
    }

    /// Verify the account registered under `email`. Fails with `InvalidCode`
    /// unless `code` equals the latest issued code; a replay after success
    /// fails the same way because the pending record is gone.
    pub fn confirm_registration(&self, email: &str, code: &str) -> Result<()> {
        if validate::code(code).is_err() {
            return Err(HubError::InvalidCode);
        }
        match self.store.confirm_registration(email, code)? {
            ConfirmOutcome::Confirmed { username } => {
                info!(%username, "Account verified");
                Ok(())
            }
            ConfirmOutcome::Rejected => Err(HubError::InvalidCode),
        }
    }

    pub fn pending_verification(&self, email: &str) -> Result<Option<PendingVerification>> {
        Ok(self.store.pending_verification(email)?)
    }

    /// Delivery agent: every task still waiting. Read-only; the same task is
    /// returned on every poll until acknowledged.
    pub fn poll_pending_deliveries(&self, admin_key: &str) -> Result<Vec<DeliveryTask>> {
        self.authorize_admin(admin_key)?;
        Ok(self.store.deliveries_by_status(DeliveryStatus::Pending)?)
    }

    /// Delivery agent: mark every pending task for `recipient` delivered.
    /// Returns the number marked; zero for a retried acknowledgement.
    pub fn acknowledge_delivery(&self, admin_key: &str, recipient: &str) -> Result<usize> {
        self.authorize_admin(admin_key)?;
        let acknowledged = self.store.acknowledge_deliveries(recipient)?;
        info!(acknowledged, "Delivery acknowledged");
        Ok(acknowledged)
    }
}

/// Uniform in [100000, 999999].
fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

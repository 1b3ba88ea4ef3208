use anyhow::anyhow;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use rand::RngCore;
use tracing::info;

use crate::error::{HubError, Result};
use crate::hub::Hub;

const TOKEN_BYTES: usize = 32;

impl Hub {
    /// Check credentials against a verified account and open a new session.
    /// Sessions accumulate; earlier tokens stay valid.
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let creds = self
            .store
            .account_by_username(username)?
            .filter(|c| c.account.verified)
            .ok_or(HubError::AuthError)?;

        let parsed_hash = PasswordHash::new(&creds.password_hash)
            .map_err(|e| anyhow!("Stored password hash for '{}' unreadable: {}", username, e))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| HubError::AuthError)?;

        let token = generate_token();
        self.store.insert_session(&token, &creds.account.username)?;

        info!(username = %creds.account.username, "Session opened");
        Ok(token)
    }

    /// Username bound to `token`, or `None` for an unknown token.
    pub fn resolve(&self, token: &str) -> Result<Option<String>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.store.session_by_token(token)?.map(|s| s.username))
    }

    pub(crate) fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            self.config.password_params.clone(),
        );
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Password hashing failed: {}", e))?
            .to_string();
        Ok(hash)
    }
}

/// 256 random bits, URL-safe base64.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    B64.encode(bytes)
}

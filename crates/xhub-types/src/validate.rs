//! Field-level checks applied to inbound payloads before they reach the core.

use thiserror::Error;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 32;
pub const PASSWORD_MIN: usize = 8;
pub const EMAIL_MAX: usize = 254;
pub const STATUS_MAX: usize = 32;
pub const GAME_MAX: usize = 64;
pub const CONTENT_MAX: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username must be 3-32 characters of letters, digits, '_', '.' or '-'")]
    Username,
    #[error("password must be at least 8 characters")]
    Password,
    #[error("invalid email address")]
    Email,
    #[error("verification code must be 6 digits")]
    Code,
    #[error("{0} is too long")]
    TooLong(&'static str),
    #[error("message content must not be empty")]
    EmptyContent,
    #[error("cannot target yourself")]
    SelfTarget,
}

pub fn username(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ValidationError::Username);
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::Username);
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::Password);
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.len() > EMAIL_MAX || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::Email);
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::Email);
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(ValidationError::Email);
    }
    Ok(())
}

pub fn code(value: &str) -> Result<(), ValidationError> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Code);
    }
    Ok(())
}

pub fn presence(status: &str, game: &str) -> Result<(), ValidationError> {
    if status.chars().count() > STATUS_MAX {
        return Err(ValidationError::TooLong("status"));
    }
    if game.chars().count() > GAME_MAX {
        return Err(ValidationError::TooLong("game"));
    }
    Ok(())
}

pub fn content(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if value.chars().count() > CONTENT_MAX {
        return Err(ValidationError::TooLong("content"));
    }
    Ok(())
}

pub fn distinct(a: &str, b: &str) -> Result<(), ValidationError> {
    if a == b {
        return Err(ValidationError::SelfTarget);
    }
    Ok(())
}

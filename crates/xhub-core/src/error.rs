use thiserror::Error;
use xhub_types::validate::ValidationError;

/// Every failure is local to one call and leaves stored state unchanged.
#[derive(Debug, Error)]
pub enum HubError {
    /// Username or email already belongs to an account.
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid code")]
    InvalidCode,

    /// Login with credentials that do not match a verified account.
    #[error("Bad credentials")]
    AuthError,

    /// Missing or unknown session token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Admin credential mismatch.
    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, authorization::Bearer};
use axum_extra::typed_header::{TypedHeader, TypedHeaderRejection};

use xhub_core::HubError;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

/// Header carrying the delivery agent's shared credential.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// The session behind a request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    /// Kept for core calls that authenticate by token themselves
    /// (messages, presence); they look the session up a second time.
    pub token: String,
}

/// Resolve `Authorization: Bearer <token>` to a session, or reject with 401.
/// A missing header and any other scheme count as no token.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| HubError::Unauthorized)?;
    let token = bearer.token().to_string();

    let hub = state.hub.clone();
    let lookup = token.clone();
    let username = blocking(move || hub.resolve(&lookup))
        .await?
        .ok_or(HubError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { username, token });
    Ok(next.run(req).await)
}

/// Admin credential as sent; empty when the header is missing.
pub fn admin_key(headers: &HeaderMap) -> String {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

use axum::{Extension, Json, extract::State, response::IntoResponse};

use xhub_types::api::{PresenceUpdateRequest, StatusResponse};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::AuthUser;

pub async fn update_presence(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PresenceUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let hub = state.hub.clone();
    blocking(move || hub.update_presence(&user.token, &req.status, &req.game)).await?;
    Ok(Json(StatusResponse::new("ok")))
}

/// Presence of the caller's friends.
pub async fn list_presence(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    let presence = blocking(move || hub.list_presence(&user.token)).await?;
    Ok(Json(presence))
}

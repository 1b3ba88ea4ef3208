use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use xhub_types::api::{MessageQuery, SendMessageRequest, SendMessageResponse};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::AuthUser;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let hub = state.hub.clone();
    let id = blocking(move || hub.send(&user.token, &req.to, &req.content)).await?;

    Ok((StatusCode::CREATED, Json(SendMessageResponse { id })))
}

/// Cursor-based polling: `?after=<last id seen>`, default 0.
pub async fn poll_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    let messages = blocking(move || hub.poll_since(&user.token, query.after)).await?;
    Ok(Json(messages))
}

pub async fn history(
    State(state): State<AppState>,
    Path(other): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    let messages = blocking(move || hub.history(&user.token, &other)).await?;
    Ok(Json(messages))
}

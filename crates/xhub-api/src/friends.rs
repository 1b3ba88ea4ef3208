use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use xhub_types::api::{FriendRequestRequest, FriendsResponse, RespondFriendRequest, StatusResponse};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::AuthUser;

pub async fn send_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FriendRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    blocking(move || hub.send_request(&user.username, &req.to)).await?;
    Ok((StatusCode::ACCEPTED, Json(StatusResponse::new("ok"))))
}

pub async fn list_incoming(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    let requests = blocking(move || hub.list_incoming(&user.username)).await?;
    Ok(Json(requests))
}

/// The caller answers a request addressed to them.
pub async fn respond(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RespondFriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    blocking(move || hub.respond(&req.from, &user.username, req.decision)).await?;
    Ok(Json(StatusResponse::new("ok")))
}

pub async fn list_friends(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    let friends = blocking(move || hub.list_friends(&user.username)).await?;
    Ok(Json(FriendsResponse { friends }))
}

pub async fn remove_friend(
    State(state): State<AppState>,
    Path(other): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    blocking(move || hub.remove_friendship(&user.username, &other)).await?;
    Ok(StatusCode::NO_CONTENT)
}

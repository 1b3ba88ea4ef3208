use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use xhub_core::Hub;
use xhub_types::api::{
    ConfirmRegistrationRequest, LoginRequest, LoginResponse, RegistrationRequest, StatusResponse,
};

use crate::error::{ApiError, blocking};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub hub: Hub,
}

pub async fn request_registration(
    State(state): State<AppState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let hub = state.hub.clone();
    blocking(move || hub.request_registration(&req.username, &req.password, &req.email)).await?;

    Ok((StatusCode::ACCEPTED, Json(StatusResponse::new("Request queued"))))
}

pub async fn confirm_registration(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let hub = state.hub.clone();
    blocking(move || hub.confirm_registration(&req.email, &req.code)).await?;

    Ok((StatusCode::CREATED, Json(StatusResponse::new("User created"))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let hub = state.hub.clone();
    let username = req.username.clone();
    let token = blocking(move || hub.login(&req.username, &req.password)).await?;

    info!(%username, "Login");
    Ok(Json(LoginResponse {
        auth: true,
        token,
        username,
    }))
}

//! Endpoints for the external delivery agent. It polls for pending tasks,
//! sends each through its own channel and acknowledges by recipient. Both
//! calls are safe to repeat.

use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};

use xhub_types::api::{AcknowledgeDeliveryRequest, AcknowledgeDeliveryResponse};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::admin_key;

pub async fn poll_pending(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let key = admin_key(&headers);
    let hub = state.hub.clone();
    let tasks = blocking(move || hub.poll_pending_deliveries(&key)).await?;
    Ok(Json(tasks))
}

pub async fn acknowledge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AcknowledgeDeliveryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let key = admin_key(&headers);
    let hub = state.hub.clone();
    let acknowledged = blocking(move || hub.acknowledge_delivery(&key, &req.email)).await?;

    Ok(Json(AcknowledgeDeliveryResponse {
        status: "ok".to_string(),
        acknowledged,
    }))
}

use axum::{
    Json, Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use xhub_types::api::HealthResponse;

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{delivery, friends, messages, presence};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "XHUB Online".to_string(),
        mode: "Passive Mail".to_string(),
    })
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health))
        .route("/auth/request_reg", post(auth::request_registration))
        .route("/auth/confirm_reg", post(auth::confirm_registration))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    // Delivery agent; the admin key is checked by the core
    let agent_routes = Router::new()
        .route("/sys/get_mail", get(delivery::poll_pending))
        .route("/sys/confirm_mail", post(delivery::acknowledge))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/presence/update", post(presence::update_presence))
        .route("/presence/list", get(presence::list_presence))
        .route(
            "/friend_requests",
            get(friends::list_incoming).post(friends::send_request),
        )
        .route("/friend_requests/respond", post(friends::respond))
        .route("/friends", get(friends::list_friends))
        .route("/friends/{username}", delete(friends::remove_friend))
        .route(
            "/messages",
            get(messages::poll_messages).post(messages::send_message),
        )
        .route("/messages/{username}", get(messages::history))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(agent_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete router: REST routes, `GET /ws`, and a 404 envelope
/// for anything else.
///
/// CORS allows any origin, method, and header; the browser client is
/// served from a different origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/maps/generate", post(handlers::generate_map))
        .route(
            "/maps/{map_id}",
            get(handlers::get_map).post(handlers::save_map),
        )
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).put(handlers::update_session),
        )
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

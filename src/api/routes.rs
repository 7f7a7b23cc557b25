//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use crate::api::websocket::ws_handler;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Fallback handler: JSON 404 for unknown routes
async fn fallback_handler() -> impl IntoResponse {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"error":"Not Found"}"#))
        .unwrap()
}

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // WebSocket for real-time events
        .route("/ws", get(ws_handler))
        // Token registry
        .route("/api/tokens", get(handlers::list_tokens))
        .route("/api/tokens", post(handlers::deploy_token))
        .route("/api/tokens/{address}", get(handlers::get_token))
        // Reads
        .route(
            "/api/tokens/{address}/balance/{account}",
            get(handlers::get_balance),
        )
        .route(
            "/api/tokens/{address}/allowance/{owner}/{spender}",
            get(handlers::get_allowance),
        )
        .route("/api/tokens/{address}/events", get(handlers::get_events))
        // Ledger operations
        .route("/api/tokens/{address}/transfer", post(handlers::transfer))
        .route("/api/tokens/{address}/approve", post(handlers::approve))
        .route(
            "/api/tokens/{address}/transfer-from",
            post(handlers::transfer_from),
        )
        .route(
            "/api/tokens/{address}/allowance/increase",
            post(handlers::increase_allowance),
        )
        .route(
            "/api/tokens/{address}/allowance/decrease",
            post(handlers::decrease_allowance),
        )
        // Administrative operations
        .route("/api/tokens/{address}/mint", post(handlers::mint))
        .route("/api/tokens/{address}/burn", post(handlers::burn))
        .route("/api/tokens/{address}/pause", post(handlers::pause))
        .route("/api/tokens/{address}/unpause", post(handlers::unpause))
        .route("/api/tokens/{address}/blacklist", post(handlers::blacklist))
        .route(
            "/api/tokens/{address}/unblacklist",
            post(handlers::unblacklist),
        )
        .route(
            "/api/tokens/{address}/ownership",
            post(handlers::transfer_ownership),
        )
        .fallback(fallback_handler)
        // Add state and middleware
        .with_state(state)
        .layer(cors)
}

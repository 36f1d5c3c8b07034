//! HTTP routes for the ask API.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{ask_question, health, AskHandlers};

/// Creates the API router with all endpoints.
pub fn ask_routes(handlers: AskHandlers) -> Router {
    Router::new()
        .route("/api/ask", post(ask_question))
        .route("/health", get(health))
        .with_state(handlers)
}

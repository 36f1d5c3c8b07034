//! HTTP handlers for the ask endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{AskQuestionError, AskQuestionHandler};

use super::dto::{AskRequest, AskResponse, ErrorResponse, HealthResponse};

/// Shared state for the ask routes.
#[derive(Clone)]
pub struct AskHandlers {
    ask_handler: Arc<AskQuestionHandler>,
}

impl AskHandlers {
    pub fn new(ask_handler: Arc<AskQuestionHandler>) -> Self {
        Self { ask_handler }
    }
}

/// POST /api/ask - Answer a question about the warehouse
pub async fn ask_question(
    State(handlers): State<AskHandlers>,
    Json(req): Json<AskRequest>,
) -> Response {
    let question = req.question.trim();
    if question.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Question must not be empty")),
        )
            .into_response();
    }

    match handlers.ask_handler.handle(question).await {
        Ok(answer) => (StatusCode::OK, Json(AskResponse { answer })).into_response(),
        Err(e) => handle_ask_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

fn handle_ask_error(error: AskQuestionError) -> Response {
    match error {
        AskQuestionError::Retrieval(e) => {
            tracing::error!(error = %e, "context retrieval failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Context retrieval failed")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::IndexError;

    #[test]
    fn retrieval_error_maps_to_500() {
        let error = AskQuestionError::Retrieval(IndexError::unavailable("index down"));
        let response = handle_ask_error(error);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

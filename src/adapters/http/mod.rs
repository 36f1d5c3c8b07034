//! HTTP adapter - the REST surface for questions.

mod dto;
mod handlers;
mod routes;

pub use dto::{AskRequest, AskResponse, ErrorResponse, HealthResponse};
pub use handlers::AskHandlers;
pub use routes::ask_routes;

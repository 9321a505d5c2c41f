use agent_core::ConversationTurn;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::state::ServeState;
use crate::learning::{EMPTY_QUESTION_MESSAGE, EXAMPLE_QUESTIONS};

const CHAT_HTML: &str = include_str!("../static/chat.html");

pub fn build_router(state: ServeState) -> Router {
    Router::new()
        .route("/", get(|| async { Html(CHAT_HTML) }))
        .route("/health", get(health_handler))
        .route("/api/examples", get(examples_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub history: Vec<ConversationTurn>,
}

async fn health_handler(State(state): State<ServeState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "waiting": state.queue.waiting(),
        "queue_limit": state.queue.limit(),
    }))
}

async fn examples_handler() -> Json<Value> {
    Json(json!({ "examples": EXAMPLE_QUESTIONS }))
}

async fn chat_handler(
    State(state): State<ServeState>,
    Json(req): Json<ChatRequest>,
) -> Response {
    let ChatRequest {
        question,
        mut history,
    } = req;

    let answer = if question.trim().is_empty() {
        EMPTY_QUESTION_MESSAGE.to_string()
    } else {
        let _permit = match state.queue.acquire().await {
            Ok(permit) => permit,
            Err(err) => {
                warn!(waiting = state.queue.waiting(), "chat request rejected");
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response();
            }
        };
        info!(chars = question.chars().count(), "chat question accepted");
        state.assistant.answer(&question).await
    };

    history.push(ConversationTurn::user(question));
    history.push(ConversationTurn::assistant(answer));
    Json(ChatResponse { history }).into_response()
}

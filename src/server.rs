//! Twin API: chat with session memory, session listing and health routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::llm::{ChatCompletionsClient, ChatMessage, LlmSettings};
use crate::persona::Persona;
use crate::session::{ConversationStore, SessionSummary, new_session_id, validate_session_id};

/// Start the Twin API with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let settings = LlmSettings::from(&config.llm);
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        has_api_key = settings.api_key.is_some(),
        "LLM configuration loaded"
    );

    let persona = Arc::new(Persona::load(&config.persona)?);
    let conversations = ConversationStore::open(&config.memory.dir).await?;
    info!(
        name: "memory.opened",
        dir = %conversations.dir().display(),
        "Conversation memory ready"
    );

    let state = AppState {
        model: Arc::new(ChatCompletionsClient::new(settings)),
        persona,
        conversations,
        config: Arc::clone(&config),
    };

    let app = router(state)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the API router with CORS, tracing and timeout layers.
pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.server.origins())?;
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Ok(Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/sessions", get(list_sessions))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|e| Error::Config(format!("CORS origin {o:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Liveness banner.
async fn root() -> Json<Value> {
    Json(json!({ "message": "AI Digital Twin API with Memory" }))
}

/// GET /health - Readiness check.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Request body for the chat API.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// User message content.
    message: String,
    /// Optional session ID (creates new if not provided).
    #[serde(default)]
    session_id: Option<String>,
}

/// Response from the chat API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The twin's reply.
    pub response: String,
    /// Session ID for this conversation.
    pub session_id: String,
}

/// POST /chat - Answer a message with session memory.
async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(req) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let session_id = match req.session_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            validate_session_id(&id)?;
            id
        }
        None => new_session_id(),
    };

    tracing::info!(
        name: "chat.request",
        session_id = %session_id,
        message_length = req.message.len(),
        "Received chat request"
    );

    let _guard = state.conversations.lock(&session_id).await;
    let mut conversation = state.conversations.load(&session_id).await?;

    let mut messages = Vec::with_capacity(conversation.len() + 2);
    messages.push(ChatMessage::system(
        state.persona.system_prompt(chrono::Local::now()),
    ));
    messages.extend(conversation.iter().cloned());
    messages.push(ChatMessage::user(req.message.as_str()));

    let reply = state.model.complete(&messages).await.map_err(Error::Model)?;

    conversation.push(ChatMessage::user(req.message));
    conversation.push(ChatMessage::assistant(reply.as_str()));
    state.conversations.save(&session_id, &conversation).await?;

    tracing::info!(
        name: "chat.completed",
        session_id = %session_id,
        message_count = conversation.len(),
        "Chat request processed"
    );

    Ok(Json(ChatResponse {
        response: reply,
        session_id,
    }))
}

/// Response for the session listing.
#[derive(Debug, Serialize)]
struct SessionsResponse {
    sessions: Vec<SessionSummary>,
}

/// GET /sessions - List stored conversations.
async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionsResponse>> {
    let sessions = state.conversations.list().await?;
    Ok(Json(SessionsResponse { sessions }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_rejects_bad_origin() {
        assert!(cors_layer(&["http://ok.test".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}

//! Ch3rry Pi3: a digital twin chat application.
//!
//! A static front-end page hosts a chat widget that talks to a small HTTP
//! API. The API keeps per-session conversation memory on disk and answers
//! through an OpenAI-compatible model primed with the twin's persona.
//!
//! # Modules
//!
//! - [`ui`]: Page shell, route table and chat widget boundary
//! - [`export`]: Build configuration and static export pipeline
//! - [`server`]: Twin API routes
//! - [`session`]: File-backed conversation memory
//! - [`persona`]: System prompt construction
//! - [`llm`]: Model client abstraction

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod persona;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::ChatModel;
use crate::persona::Persona;
use crate::session::ConversationStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Model that produces the twin's replies.
    pub model: Arc<dyn ChatModel>,
    /// Source of the system prompt.
    pub persona: Arc<Persona>,
    /// Conversation memory.
    pub conversations: ConversationStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("conversations", &self.conversations)
            .field("config", &self.config)
            .finish()
    }
}

//! Conversation memory.
//!
//! Each session's history lives in its own JSON file so the twin can recall
//! earlier messages across requests and restarts. Sessions are identified by
//! a client-held id (a UUID when the server generates it).
//!
//! # Example
//!
//! ```rust,no_run
//! use ch3rry_pi3::llm::ChatMessage;
//! use ch3rry_pi3::session::ConversationStore;
//!
//! # async fn demo() -> ch3rry_pi3::error::Result<()> {
//! let store = ConversationStore::open("memory").await?;
//! store.save("abc", &[ChatMessage::user("Hello!")]).await?;
//! assert_eq!(store.load("abc").await?.len(), 1);
//! # Ok(())
//! # }
//! ```

mod store;

pub use store::{
    ConversationStore, SessionLock, SessionSummary, new_session_id, validate_session_id,
};

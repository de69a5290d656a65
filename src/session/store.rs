//! File-backed conversation store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::llm::ChatMessage;

/// Longest accepted session id.
const MAX_SESSION_ID_LEN: usize = 128;

/// Summary of one stored conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: usize,
    pub last_message: Option<String>,
}

/// Validate a client-supplied session id.
///
/// Ids become file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_session_id(id: &str) -> Result<()> {
    let ok = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidSessionId(id.to_string()))
    }
}

/// Generate a fresh session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Held while a session is being read and rewritten.
///
/// Dropping the last holder removes the session's entry from the lock map.
#[derive(Debug)]
pub struct SessionLock {
    guard: Option<OwnedMutexGuard<()>>,
    session_id: String,
    locks: LockMap,
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.session_id)
            .is_some_and(|l| Arc::strong_count(l) == 1)
        {
            locks.remove(&self.session_id);
        }
    }
}

/// Per-session conversation history stored as `<dir>/<session_id>.json`.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    dir: PathBuf,
    locks: LockMap,
}

impl ConversationStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: &str) -> Result<PathBuf> {
        validate_session_id(session_id)?;
        Ok(self.dir.join(format!("{session_id}.json")))
    }

    /// Exclusive access to one session for a read-modify-write cycle.
    pub async fn lock(&self, session_id: &str) -> SessionLock {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(session_id.to_string()).or_default())
        };
        SessionLock {
            guard: Some(lock.lock_owned().await),
            session_id: session_id.to_string(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Sessions that currently hold or wait for a lock.
    pub fn active_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Load a conversation; unknown sessions are empty.
    pub async fn load(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let path = self.path_for(session_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist a conversation, replacing any previous content.
    pub async fn save(&self, session_id: &str, messages: &[ChatMessage]) -> Result<()> {
        let path = self.path_for(session_id)?;
        let tmp = self.dir.join(format!(".{session_id}.json.tmp"));
        let json = serde_json::to_vec_pretty(messages)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Summaries of every stored session, sorted by id.
    ///
    /// Files that cannot be parsed are skipped.
    pub async fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut sessions = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(session_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_session_id(session_id).is_err() {
                continue;
            }

            let messages: Vec<ChatMessage> = match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!(name: "session.list.skipped", path = %path.display(), error = %e, "Unreadable conversation file");
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!(name: "session.list.skipped", path = %path.display(), error = %e, "Unreadable conversation file");
                    continue;
                }
            };

            sessions.push(SessionSummary {
                session_id: session_id.to_string(),
                message_count: messages.len(),
                last_message: messages.last().map(|m| m.content.clone()),
            });
        }

        sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_session_id() {
        assert!(validate_session_id(&new_session_id()).is_ok());
        assert!(validate_session_id("abc_DEF-123").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("../escape").is_err());
        assert!(validate_session_id("a/b").is_err());
        assert!(validate_session_id(&"x".repeat(129)).is_err());
    }

    #[tokio::test]
    async fn test_load_unknown_session_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        assert!(store.load("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        let messages = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];

        store.save("s1", &messages).await.unwrap();
        assert_eq!(store.load("s1").await.unwrap(), messages);
        assert!(!dir.path().join(".s1.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_list_summaries_sorted() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        store
            .save("b", &[ChatMessage::user("q"), ChatMessage::assistant("last")])
            .await
            .unwrap();
        store.save("a", &[]).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sessions = store.list().await.unwrap();
        assert_eq!(
            sessions,
            vec![
                SessionSummary {
                    session_id: "a".to_string(),
                    message_count: 0,
                    last_message: None,
                },
                SessionSummary {
                    session_id: "b".to_string(),
                    message_count: 2,
                    last_message: Some("last".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_id_never_touches_disk() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.save("../x", &[]).await,
            Err(Error::InvalidSessionId(_))
        ));
    }

    #[tokio::test]
    async fn test_lock_entries_released() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();

        for i in 0..50 {
            let _guard = store.lock(&format!("s{i}")).await;
            assert_eq!(store.active_locks(), 1);
        }
        assert_eq!(store.active_locks(), 0);
    }

    #[tokio::test]
    async fn test_lock_kept_while_waiter_queued() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();

        let first = store.lock("shared").await;
        let waiter = {
            let store = store.clone();
            tokio::spawn(async move {
                let _guard = store.lock("shared").await;
            })
        };
        // Map, held guard and queued waiter
        while Arc::strong_count(&store.locks.lock().unwrap()["shared"]) < 3 {
            tokio::task::yield_now().await;
        }
        drop(first);
        assert_eq!(store.active_locks(), 1);

        waiter.await.unwrap();
        assert_eq!(store.active_locks(), 0);
    }
}

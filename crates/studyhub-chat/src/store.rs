//! Chat Session Store
//!
//! Ordered collection of conversation sessions with one current pointer.
//! The whole collection and the current id are rewritten to storage after
//! every mutation; unknown ids and empty input are silent no-ops.

use parking_lot::RwLock;
use std::sync::Arc;

use studyhub_storage::{load_json, save_json, KeyValueStore};

use crate::session::{ChatMessage, ConversationSession, HistoryTurn, Sender};
use crate::Result;

pub const SESSIONS_KEY: &str = "ai_chat_sessions";
pub const CURRENT_SESSION_KEY: &str = "ai_chat_current_session";

pub struct ChatSessionStore {
    /// Sessions in creation order
    sessions: Arc<RwLock<Vec<ConversationSession>>>,
    current_session_id: Arc<RwLock<Option<String>>>,
    storage: Arc<dyn KeyValueStore>,
}

impl ChatSessionStore {
    /// Load persisted sessions. Unreadable state is logged and treated as
    /// empty; an empty collection gets a fresh session.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let sessions: Vec<ConversationSession> =
            match load_json(storage.as_ref(), SESSIONS_KEY) {
                Ok(sessions) => sessions.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!("Discarding unreadable chat sessions: {}", e);
                    Vec::new()
                }
            };

        let saved_current: Option<String> =
            match load_json(storage.as_ref(), CURRENT_SESSION_KEY) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Discarding unreadable current session id: {}", e);
                    None
                }
            };

        let current = saved_current
            .filter(|id| sessions.iter().any(|s| &s.id == id))
            .or_else(|| sessions.first().map(|s| s.id.clone()));

        let store = Self {
            sessions: Arc::new(RwLock::new(sessions)),
            current_session_id: Arc::new(RwLock::new(current)),
            storage,
        };

        if store.current_session_id().is_none() {
            if let Err(e) = store.create_session() {
                tracing::error!("Failed to persist initial chat session: {}", e);
            }
        }

        tracing::info!(
            session_count = store.len(),
            current = ?store.current_session_id(),
            "Loaded chat sessions"
        );

        store
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.current_session_id.read().clone()
    }

    pub fn current_session(&self) -> Option<ConversationSession> {
        let id = self.current_session_id()?;
        self.get_session(&id)
    }

    pub fn get_session(&self, session_id: &str) -> Option<ConversationSession> {
        self.sessions
            .read()
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    /// Sessions for display, most recently updated first
    pub fn list_sessions(&self) -> Vec<ConversationSession> {
        let mut sessions = self.sessions.read().clone();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    /// Append an empty session and make it current
    pub fn create_session(&self) -> Result<ConversationSession> {
        let session = ConversationSession::new();

        let mut sessions = self.sessions.write();
        let mut next = sessions.clone();
        next.push(session.clone());
        self.write_back(&next, Some(&session.id))?;
        *sessions = next;
        *self.current_session_id.write() = Some(session.id.clone());

        tracing::info!(session_id = %session.id, "Created chat session");

        Ok(session)
    }

    /// Append to the current session. `None` if there is no current session.
    pub fn append_message(&self, text: &str, sender: Sender) -> Result<Option<ChatMessage>> {
        let Some(current) = self.current_session_id() else {
            tracing::debug!("No current chat session, message dropped");
            return Ok(None);
        };

        let mut sessions = self.sessions.write();
        let mut next = sessions.clone();
        let Some(session) = next.iter_mut().find(|s| s.id == current) else {
            return Ok(None);
        };
        let message = session.push_message(text.to_string(), sender);
        self.write_back(&next, Some(&current))?;
        *sessions = next;

        Ok(Some(message))
    }

    /// Make `session_id` current and return its persisted state
    pub fn switch_session(&self, session_id: &str) -> Result<Option<ConversationSession>> {
        {
            let sessions = self.sessions.read();
            if !sessions.iter().any(|s| s.id == session_id) {
                tracing::debug!(session_id = %session_id, "Unknown chat session");
                return Ok(None);
            }
            self.write_back(&sessions, Some(session_id))?;
            *self.current_session_id.write() = Some(session_id.to_string());
        }

        tracing::info!(session_id = %session_id, "Switched chat session");

        Ok(self.reload_session(session_id))
    }

    /// Remove a session. If it was current, the most recently updated
    /// remaining session becomes current, or a fresh one is created.
    pub fn delete_session(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write();
        if !sessions.iter().any(|s| s.id == session_id) {
            return Ok(false);
        }

        let mut next = sessions.clone();
        next.retain(|s| s.id != session_id);

        let current = self.current_session_id();
        let next_current = if current.as_deref() != Some(session_id) {
            current
        } else if let Some(recent) = next.iter().max_by_key(|s| s.updated_at) {
            Some(recent.id.clone())
        } else {
            let fresh = ConversationSession::new();
            let id = fresh.id.clone();
            next.push(fresh);
            tracing::info!(session_id = %id, "Created chat session");
            Some(id)
        };

        self.write_back(&next, next_current.as_deref())?;
        *sessions = next;
        *self.current_session_id.write() = next_current;

        tracing::info!(session_id = %session_id, "Deleted chat session");

        Ok(true)
    }

    /// Set a new title. Empty or whitespace-only titles are ignored.
    pub fn rename_session(
        &self,
        session_id: &str,
        title: &str,
    ) -> Result<Option<ConversationSession>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let mut sessions = self.sessions.write();
        let mut next = sessions.clone();
        let Some(session) = next.iter_mut().find(|s| s.id == session_id) else {
            return Ok(None);
        };
        session.rename(title.to_string());
        let renamed = session.clone();
        let current = self.current_session_id();
        self.write_back(&next, current.as_deref())?;
        *sessions = next;

        Ok(Some(renamed))
    }

    /// Plain-text transcript of a session
    pub fn export_session(&self, session_id: &str) -> Option<String> {
        self.get_session(session_id).map(|s| s.transcript())
    }

    /// Recent messages of the current session as request history
    pub fn history(&self, limit: usize) -> Vec<HistoryTurn> {
        self.current_session()
            .map(|s| s.history(limit))
            .unwrap_or_default()
    }

    /// Write a prospective state to storage. Callers commit it to memory
    /// only after this succeeds, so a failed write leaves both unchanged.
    fn write_back(&self, sessions: &[ConversationSession], current: Option<&str>) -> Result<()> {
        let storage = self.storage.as_ref();
        save_json(storage, SESSIONS_KEY, sessions)?;
        match current {
            Some(id) => save_json(storage, CURRENT_SESSION_KEY, id)?,
            None => storage.remove(CURRENT_SESSION_KEY)?,
        }

        tracing::trace!(session_count = sessions.len(), "Persisted chat sessions");
        Ok(())
    }

    fn reload_session(&self, session_id: &str) -> Option<ConversationSession> {
        match load_json::<Vec<ConversationSession>>(self.storage.as_ref(), SESSIONS_KEY) {
            Ok(Some(saved)) => saved.into_iter().find(|s| s.id == session_id),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Falling back to in-memory session: {}", e);
                self.get_session(session_id)
            }
        }
    }
}

impl Clone for ChatSessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            current_session_id: Arc::clone(&self.current_session_id),
            storage: Arc::clone(&self.storage),
        }
    }
}

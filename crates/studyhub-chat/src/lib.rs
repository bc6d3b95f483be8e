//! StudyHub Chat Sessions
//!
//! - A session is one persisted conversation thread
//! - Exactly one session is current once the store is loaded
//! - Every mutation rewrites the whole collection to storage
//! - Deleting the last session synthesizes a fresh one

mod error;
mod session;
mod store;

pub use error::ChatError;
pub use session::{ChatMessage, ConversationSession, HistoryTurn, Sender};
pub use store::{ChatSessionStore, CURRENT_SESSION_KEY, SESSIONS_KEY};

pub type Result<T> = std::result::Result<T, ChatError>;

//! Conversation session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "New conversation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// One entry of the `history` array sent with a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Sender,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSession {
    /// Time-ordered unique identifier
    pub id: String,
    /// User-editable display label
    pub title: String,
    /// Messages in insertion order
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new() -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::now_v7().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push_message(&mut self, text: String, sender: Sender) -> ChatMessage {
        let message = ChatMessage {
            text,
            sender,
            timestamp: Utc::now(),
        };
        self.messages.push(message.clone());
        self.updated_at = message.timestamp;
        message
    }

    pub fn rename(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The last `limit` messages as request history, oldest first
    pub fn history(&self, limit: usize) -> Vec<HistoryTurn> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages
            .iter()
            .skip(skip)
            .map(|m| HistoryTurn {
                role: m.sender,
                content: m.text.clone(),
            })
            .collect()
    }

    /// Plain-text transcript: title, timestamps, then one line per message
    pub fn transcript(&self) -> String {
        const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&format!("Created: {}\n", self.created_at.format(FORMAT)));
        out.push_str(&format!("Updated: {}\n", self.updated_at.format(FORMAT)));
        out.push('\n');

        for message in &self.messages {
            out.push_str(&format!(
                "[{} {}] {}\n",
                message.sender.label(),
                message.timestamp.format(FORMAT),
                message.text
            ));
        }
        out
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

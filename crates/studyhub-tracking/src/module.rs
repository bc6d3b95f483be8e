//! Tracked module identifiers

use serde::{Deserialize, Serialize};

use crate::error::TrackingError;

/// A feature area whose usage time is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedModule {
    Dashboard,
    ErrorBook,
    Practice,
    Notes,
    AiChat,
}

impl TrackedModule {
    pub const ALL: [TrackedModule; 5] = [
        TrackedModule::Dashboard,
        TrackedModule::ErrorBook,
        TrackedModule::Practice,
        TrackedModule::Notes,
        TrackedModule::AiChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedModule::Dashboard => "dashboard",
            TrackedModule::ErrorBook => "error_book",
            TrackedModule::Practice => "practice",
            TrackedModule::Notes => "notes",
            TrackedModule::AiChat => "ai_chat",
        }
    }
}

impl std::fmt::Display for TrackedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TrackedModule {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "dashboard" => Ok(TrackedModule::Dashboard),
            "error_book" | "errorbook" => Ok(TrackedModule::ErrorBook),
            "practice" => Ok(TrackedModule::Practice),
            "notes" => Ok(TrackedModule::Notes),
            "ai_chat" | "aichat" => Ok(TrackedModule::AiChat),
            _ => Err(TrackingError::UnknownModule(s.to_string())),
        }
    }
}

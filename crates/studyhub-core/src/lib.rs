//! StudyHub Core
//!
//! Client-side state for the study assistant: configuration, the
//! application container, preferences and the legacy error-bank cache.

mod app;
mod config;
mod error;
mod error_cache;
mod preferences;

pub use app::StudyApp;
pub use config::{Config, Environment};
pub use error::CoreError;
pub use error_cache::{CachedErrorItem, ErrorBankCache};
pub use preferences::{Preferences, Theme};

// Re-export core components
pub use studyhub_api::{ApiClient, ApiError, DashboardEndpoint, Fetched};
pub use studyhub_chat::{ChatMessage, ChatSessionStore, ConversationSession, Sender};
pub use studyhub_storage::{Database, KeyValueStore, MemoryStore, StorageError};
pub use studyhub_tracking::{
    ActivityKind, FlushOutcome, ModuleTracker, TeardownEvent, TimerState, TrackedModule,
    TrackingConfig, Visibility,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

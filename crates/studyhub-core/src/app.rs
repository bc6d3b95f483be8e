//! Application state container
//!
//! The hosting page builds one `StudyApp` and passes it to whatever needs
//! chat sessions, preferences or module trackers.

use std::sync::Arc;

use studyhub_api::{ApiClient, Fetched};
use studyhub_chat::{ChatSessionStore, Sender};
use studyhub_storage::{Database, KeyValueStore};
use studyhub_tracking::{
    BeaconTransport, BlockingTransport, Clock, DeliveryGuard, DeliveryPolicy, ModuleTracker,
    SystemClock, TrackedModule,
};

use crate::config::Config;
use crate::error_cache::ErrorBankCache;
use crate::preferences::Preferences;
use crate::Result;

const TRACK_MODULE_PATH: &str = "/api/track_module";

pub struct StudyApp {
    /// Configuration
    config: Config,
    /// Durable local state
    storage: Arc<dyn KeyValueStore>,
    /// Backend client
    api: ApiClient,
    /// AI chat sessions
    chat: ChatSessionStore,
    /// Theme and layout flags
    preferences: Preferences,
    /// Legacy local error-bank items
    error_cache: ErrorBankCache,
    /// Time source handed to module trackers
    clock: Arc<dyn Clock>,
}

impl StudyApp {
    /// Open the on-disk state database and load persisted state
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Self::with_storage(config, Arc::new(db))
    }

    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let api = ApiClient::new(config.api_url()?)?;
        let chat = ChatSessionStore::load(Arc::clone(&storage));

        tracing::info!(
            environment = %config.environment,
            api = %api.base_url(),
            "StudyHub client initialized"
        );

        Ok(Self {
            preferences: Preferences::new(Arc::clone(&storage)),
            error_cache: ErrorBankCache::new(Arc::clone(&storage)),
            config,
            storage,
            api,
            chat,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used by trackers created afterwards
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn chat(&self) -> &ChatSessionStore {
        &self.chat
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn error_cache(&self) -> &ErrorBankCache {
        &self.error_cache
    }

    /// Start tracking a page. Idle checks run on the current tokio runtime
    /// when there is one; otherwise the host calls `on_idle_check` itself.
    pub fn track_module(&self, module: TrackedModule) -> Result<ModuleTracker> {
        let tracking = &self.config.tracking;
        let endpoint = self.api.endpoint(TRACK_MODULE_PATH)?;

        let guard = DeliveryGuard::new(
            DeliveryPolicy::from_config(tracking),
            Arc::new(BeaconTransport::new(endpoint.clone())),
            Arc::new(BlockingTransport::new(endpoint, tracking.blocking_timeout())),
        );

        let tracker = ModuleTracker::new(module, tracking, Arc::clone(&self.clock), guard);
        tracker.start_idle_checks(tracking.idle_check_interval());

        Ok(tracker)
    }

    /// Send a chat message from the current session and record the reply.
    /// The user's message is kept even when the request fails.
    pub async fn send_chat(&self, text: &str) -> Result<Fetched<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Fetched::placeholder("empty message"));
        }

        let history = self.chat.history(self.config.chat_history_limit);
        self.chat.append_message(text, Sender::User)?;

        let reply = self.api.send_chat(text, &history).await?;
        match &reply {
            Fetched::Ready(response) => {
                self.chat.append_message(response, Sender::Assistant)?;
            }
            Fetched::Placeholder { reason } => {
                tracing::warn!(%reason, "Chat reply unavailable");
            }
        }

        Ok(reply)
    }
}

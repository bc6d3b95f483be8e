//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] studyhub_storage::StorageError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] studyhub_tracking::TrackingError),

    #[error("Chat error: {0}")]
    Chat(#[from] studyhub_chat::ChatError),

    #[error("API error: {0}")]
    Api(#[from] studyhub_api::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

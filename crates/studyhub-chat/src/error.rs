//! Chat session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Storage error: {0}")]
    Storage(#[from] studyhub_storage::StorageError),
}

//! StudyHub Storage Layer
//!
//! Durable key/value persistence for client state (chat sessions,
//! preferences, cached error-bank items). Values are whole-value
//! overwrites: the last write wins.

mod database;
mod error;
mod kv;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use kv::{load_json, save_json, KeyValueStore, MemoryStore};

pub type Result<T> = std::result::Result<T, StorageError>;

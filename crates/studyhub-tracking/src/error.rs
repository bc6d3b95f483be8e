//! Tracking error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint rejected report with status {0}")]
    Rejected(u16),

    #[error("Unknown module: {0}")]
    UnknownModule(String),
}

//! StudyHub Backend Client
//!
//! Typed access to the backend REST API. Every response body is read as a
//! `{success, error?, ...payload}` envelope:
//! - transport failures and non-2xx statuses are `ApiError`s (show a toast)
//! - `success` not `true`, or a missing field, is `Fetched::Placeholder`
//!   (render an empty state)

mod auth;
mod chat;
mod client;
mod dashboard;
mod envelope;
mod error;
mod error_bank;

pub use auth::{ProfileUpdate, RegisterRequest, StudentUpdate};
pub use client::ApiClient;
pub use dashboard::DashboardEndpoint;
pub use envelope::{Envelope, Fetched};
pub use error::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;

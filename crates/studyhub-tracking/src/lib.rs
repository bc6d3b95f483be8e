//! StudyHub Module Tracking
//!
//! Measures how long a user is actively present on a tracked page and
//! delivers the total to the backend once, when the page goes away.
//!
//! - `UsageTimer` is the active/idle/paused state machine
//! - `DeliveryGuard` folds, filters, clamps and sends the total
//! - `ModuleTracker` hosts both for one page and drives the idle check

mod clock;
mod config;
mod error;
mod guard;
mod module;
mod state;
mod timer;
mod tracker;
mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TrackingConfig;
pub use error::TrackingError;
pub use guard::{DeliveryGuard, DeliveryPolicy, FlushOutcome};
pub use module::TrackedModule;
pub use state::TimerState;
pub use timer::UsageTimer;
pub use tracker::{ActivityKind, ModuleTracker, TeardownEvent, Visibility};
pub use transport::{
    BeaconTransport, BlockingTransport, Transport, TransportKind, UsageReport,
};

pub type Result<T> = std::result::Result<T, TrackingError>;

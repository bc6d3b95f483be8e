//! Usage Timer States
//!
//! ```text
//! Active
//!   ↓ no activity for longer than the idle threshold
//! Idle      (derived, still counting until the next idle check)
//!   ↓ idle check / tab hidden
//! Paused
//!   ↓ activity / tab visible
//! Active
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// User is present, the current stretch is counting
    Active,
    /// Nominally active but the last activity is older than the threshold
    Idle,
    /// Not counting; the last stretch has been banked
    Paused,
}

impl TimerState {
    /// Returns true while an active stretch is open
    pub fn is_counting(&self) -> bool {
        matches!(self, TimerState::Active | TimerState::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Active => "active",
            TimerState::Idle => "idle",
            TimerState::Paused => "paused",
        }
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TimerState::Active),
            "idle" => Ok(TimerState::Idle),
            "paused" => Ok(TimerState::Paused),
            _ => Err(format!("Unknown timer state: {}", s)),
        }
    }
}

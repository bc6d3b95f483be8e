//! Tracking configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Gap between activity events after which the user counts as idle
    pub idle_threshold_secs: u64,
    /// Period of the idle check
    pub idle_check_interval_secs: u64,
    /// Totals below this are not reported
    pub min_reportable_secs: u64,
    /// Upper bound for a single report
    pub max_report_secs: u64,
    /// Timeout of the blocking fallback send
    pub blocking_timeout_secs: u64,
}

impl TrackingConfig {
    pub fn idle_threshold(&self) -> Duration {
        Duration::seconds(self.idle_threshold_secs as i64)
    }

    pub fn idle_check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_check_interval_secs.max(1))
    }

    pub fn blocking_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.blocking_timeout_secs)
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: 60,
            idle_check_interval_secs: 30,
            min_reportable_secs: 5,
            max_report_secs: 7200,
            blocking_timeout_secs: 3,
        }
    }
}

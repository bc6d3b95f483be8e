//! Per-page module tracker
//!
//! Owns the usage timer and delivery guard of one tracked page. The host
//! forwards page events to the named handlers; `start_idle_checks` runs the
//! periodic idle check on the tokio runtime until teardown.

use chrono::Duration;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::config::TrackingConfig;
use crate::guard::{DeliveryGuard, FlushOutcome};
use crate::module::TrackedModule;
use crate::state::TimerState;
use crate::timer::UsageTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PointerMove,
    KeyPress,
    Scroll,
    Touch,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownEvent {
    PageHide,
    BeforeUnload,
}

pub struct ModuleTracker {
    timer: Arc<Mutex<UsageTimer>>,
    guard: DeliveryGuard,
    idle_check: Mutex<Option<JoinHandle<()>>>,
    torn_down: Arc<AtomicBool>,
}

impl ModuleTracker {
    pub fn new(
        module: TrackedModule,
        config: &TrackingConfig,
        clock: Arc<dyn Clock>,
        guard: DeliveryGuard,
    ) -> Self {
        let timer = UsageTimer::new(module, config.idle_threshold(), clock);

        tracing::info!(module = %module, "Tracking module usage");

        Self {
            timer: Arc::new(Mutex::new(timer)),
            guard,
            idle_check: Mutex::new(None),
            torn_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn module(&self) -> TrackedModule {
        self.timer.lock().module()
    }

    pub fn state(&self) -> TimerState {
        self.timer.lock().state()
    }

    pub fn current_duration(&self) -> Duration {
        self.timer.lock().current_duration()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Spawn the periodic idle check on the current tokio runtime.
    /// Returns false when there is no runtime or the tracker is torn down.
    pub fn start_idle_checks(&self, period: std::time::Duration) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("No async runtime, idle checks left to the host");
            return false;
        };

        let timer = Arc::clone(&self.timer);
        let torn_down = Arc::clone(&self.torn_down);

        let task = runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if torn_down.load(Ordering::SeqCst) {
                    break;
                }
                timer.lock().on_idle_check();
            }
        });

        if let Some(previous) = self.idle_check.lock().replace(task) {
            previous.abort();
        }
        true
    }

    pub fn on_activity(&self, kind: ActivityKind) {
        if self.is_torn_down() {
            return;
        }
        tracing::trace!(kind = ?kind, "Activity");
        self.timer.lock().on_activity();
    }

    pub fn on_idle_check(&self) -> bool {
        if self.is_torn_down() {
            return false;
        }
        self.timer.lock().on_idle_check()
    }

    pub fn on_visibility_change(&self, visibility: Visibility) {
        if self.is_torn_down() {
            return;
        }
        self.timer
            .lock()
            .on_visibility_change(visibility == Visibility::Visible);
    }

    /// Page is going away. The first teardown event flushes; later ones
    /// return `None`.
    pub fn on_teardown(&self, event: TeardownEvent) -> Option<FlushOutcome> {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            tracing::debug!(event = ?event, "Tracker already torn down");
            return None;
        }

        tracing::debug!(event = ?event, "Tearing down tracker");
        self.cancel_idle_checks();
        Some(self.guard.flush(&mut self.timer.lock()))
    }

    /// Explicit flush without ending the page. The timer stays paused
    /// until the next activity event.
    pub fn flush(&self) -> FlushOutcome {
        self.guard.flush(&mut self.timer.lock())
    }

    fn cancel_idle_checks(&self) {
        if let Some(task) = self.idle_check.lock().take() {
            task.abort();
        }
    }
}

impl Drop for ModuleTracker {
    fn drop(&mut self) {
        self.cancel_idle_checks();
    }
}

//! Usage timer
//!
//! Counts the time a user is actively present on a tracked page. Brief
//! pauses between activity events still count; a gap longer than the idle
//! threshold, or the tab being hidden, pauses the timer and banks the open
//! stretch into the accumulator.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::clock::Clock;
use crate::module::TrackedModule;
use crate::state::TimerState;

pub struct UsageTimer {
    module: TrackedModule,
    clock: Arc<dyn Clock>,
    idle_threshold: Duration,
    /// Start of the open stretch; `None` while paused
    session_start: Option<DateTime<Utc>>,
    /// Banked time from completed stretches
    accumulated: Duration,
    last_activity_at: DateTime<Utc>,
}

impl UsageTimer {
    /// Create a timer that starts active at the clock's current time
    pub fn new(module: TrackedModule, idle_threshold: Duration, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();

        tracing::debug!(module = %module, "Usage timer started");

        Self {
            module,
            clock,
            idle_threshold,
            session_start: Some(now),
            accumulated: Duration::zero(),
            last_activity_at: now,
        }
    }

    pub fn module(&self) -> TrackedModule {
        self.module
    }

    pub fn is_active(&self) -> bool {
        self.session_start.is_some()
    }

    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.session_start
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Time banked from completed stretches, excluding the open one
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Current state, with `Idle` derived from the activity gap
    pub fn state(&self) -> TimerState {
        if !self.is_active() {
            TimerState::Paused
        } else if self.clock.now() - self.last_activity_at > self.idle_threshold {
            TimerState::Idle
        } else {
            TimerState::Active
        }
    }

    /// Banked time plus the open stretch. Does not mutate the timer.
    pub fn current_duration(&self) -> Duration {
        match self.session_start {
            Some(start) => self.accumulated + non_negative(self.clock.now() - start),
            None => self.accumulated,
        }
    }

    /// A user-activity event was observed
    pub fn on_activity(&mut self) {
        let now = self.clock.now();
        if self.session_start.is_none() {
            self.session_start = Some(now);
            tracing::debug!(module = %self.module, "Usage timer resumed on activity");
        }
        self.last_activity_at = now;
    }

    /// Periodic check: pause once the activity gap exceeds the threshold.
    /// Returns true if this call paused the timer.
    pub fn on_idle_check(&mut self) -> bool {
        if self.state() != TimerState::Idle {
            return false;
        }

        tracing::debug!(
            module = %self.module,
            idle_for = (self.clock.now() - self.last_activity_at).num_seconds(),
            "Usage timer idle"
        );
        self.pause();
        true
    }

    /// Tab visibility changed
    pub fn on_visibility_change(&mut self, visible: bool) {
        if visible {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Bank the open stretch and stop counting. No-op while paused.
    pub fn pause(&mut self) {
        if let Some(start) = self.session_start.take() {
            let stretch = non_negative(self.clock.now() - start);
            self.accumulated = self.accumulated + stretch;

            tracing::debug!(
                module = %self.module,
                stretch_secs = stretch.num_seconds(),
                accumulated_secs = self.accumulated.num_seconds(),
                "Usage timer paused"
            );
        }
    }

    /// Open a new stretch now. No-op while active.
    pub fn resume(&mut self) {
        if self.session_start.is_some() {
            return;
        }

        let now = self.clock.now();
        self.session_start = Some(now);
        self.last_activity_at = now;

        tracing::debug!(module = %self.module, "Usage timer resumed");
    }

    /// Fold the open stretch and hand out everything banked, leaving the
    /// timer paused at zero
    pub fn take_accumulated(&mut self) -> Duration {
        self.pause();
        std::mem::replace(&mut self.accumulated, Duration::zero())
    }
}

fn non_negative(d: Duration) -> Duration {
    d.max(Duration::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn timer() -> (UsageTimer, ManualClock) {
        let clock = ManualClock::default();
        let timer = UsageTimer::new(
            TrackedModule::Notes,
            Duration::seconds(60),
            Arc::new(clock.clone()),
        );
        (timer, clock)
    }

    #[test]
    fn test_new_timer_is_active() {
        let (timer, clock) = timer();
        assert!(timer.is_active());
        assert_eq!(timer.state(), TimerState::Active);
        assert_eq!(timer.session_start(), Some(clock.now()));
        assert_eq!(timer.current_duration(), Duration::zero());
    }

    #[test]
    fn test_activity_while_paused_resumes_at_event_time() {
        let (mut timer, clock) = timer();
        timer.pause();
        assert_eq!(timer.state(), TimerState::Paused);

        clock.advance(Duration::seconds(300));
        timer.on_activity();

        assert_eq!(timer.state(), TimerState::Active);
        assert_eq!(timer.session_start(), Some(clock.now()));
        assert_eq!(timer.last_activity_at(), clock.now());
    }

    #[test]
    fn test_activity_while_active_keeps_stretch() {
        let (mut timer, clock) = timer();
        let start = timer.session_start();

        clock.advance(Duration::seconds(10));
        timer.on_activity();

        assert_eq!(timer.session_start(), start);
        assert_eq!(timer.last_activity_at(), clock.now());
    }

    #[test]
    fn test_current_duration_is_pure() {
        let (mut timer, clock) = timer();
        clock.advance(Duration::seconds(20));
        timer.pause();
        timer.resume();
        clock.advance(Duration::seconds(7));

        let first = timer.current_duration();
        let second = timer.current_duration();
        assert_eq!(first, second);
        assert_eq!(first, Duration::seconds(27));
        assert_eq!(timer.accumulated(), Duration::seconds(20));

        clock.advance(Duration::seconds(1));
        assert!(timer.current_duration() >= second);
    }

    #[test]
    fn test_idle_check_pauses_after_threshold() {
        let (mut timer, clock) = timer();

        clock.advance(Duration::seconds(30));
        assert!(!timer.on_idle_check());
        assert_eq!(timer.state(), TimerState::Active);

        clock.advance(Duration::seconds(31));
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.on_idle_check());

        assert_eq!(timer.state(), TimerState::Paused);
        assert_eq!(timer.session_start(), None);
        assert_eq!(timer.accumulated(), Duration::seconds(61));
    }

    #[test]
    fn test_idle_check_while_paused_is_noop() {
        let (mut timer, clock) = timer();
        clock.advance(Duration::seconds(5));
        timer.pause();

        clock.advance(Duration::seconds(500));
        assert!(!timer.on_idle_check());
        assert_eq!(timer.accumulated(), Duration::seconds(5));
    }

    #[test]
    fn test_visibility_hidden_then_visible() {
        let (mut timer, clock) = timer();
        clock.advance(Duration::seconds(12));
        timer.on_visibility_change(false);
        assert_eq!(timer.accumulated(), Duration::seconds(12));

        clock.advance(Duration::seconds(100));
        timer.on_visibility_change(true);
        assert_eq!(timer.session_start(), Some(clock.now()));
        assert_eq!(timer.last_activity_at(), clock.now());

        clock.advance(Duration::seconds(3));
        assert_eq!(timer.current_duration(), Duration::seconds(15));
    }

    #[test]
    fn test_repeated_pause_and_resume_are_noops() {
        let (mut timer, clock) = timer();
        clock.advance(Duration::seconds(8));
        timer.pause();
        clock.advance(Duration::seconds(8));
        timer.pause();
        assert_eq!(timer.accumulated(), Duration::seconds(8));

        timer.resume();
        let start = timer.session_start();
        clock.advance(Duration::seconds(4));
        timer.resume();
        assert_eq!(timer.session_start(), start);
    }

    #[test]
    fn test_take_accumulated_resets() {
        let (mut timer, clock) = timer();
        clock.advance(Duration::seconds(42));

        assert_eq!(timer.take_accumulated(), Duration::seconds(42));
        assert_eq!(timer.accumulated(), Duration::zero());
        assert!(!timer.is_active());
        assert_eq!(timer.take_accumulated(), Duration::zero());
    }
}

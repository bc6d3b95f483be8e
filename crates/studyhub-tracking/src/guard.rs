//! Flush-once delivery of accumulated usage
//!
//! The guard folds any open stretch, drops totals too small to be worth
//! reporting, clamps outliers and hands the report to the best available
//! transport. The timer is reset after every dispatch attempt, so a second
//! trigger during the same teardown finds nothing to send.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::TrackingConfig;
use crate::timer::UsageTimer;
use crate::transport::{Transport, TransportKind, UsageReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub min_reportable_secs: u64,
    pub max_report_secs: u64,
}

impl DeliveryPolicy {
    pub fn from_config(config: &TrackingConfig) -> Self {
        Self {
            min_reportable_secs: config.min_reportable_secs,
            max_report_secs: config.max_report_secs,
        }
    }

    /// Seconds to report for a banked total, or `None` if it is noise
    pub fn reportable_seconds(&self, total: Duration) -> Option<u64> {
        let seconds = total.num_seconds().max(0) as u64;
        if seconds < self.min_reportable_secs {
            None
        } else {
            Some(seconds.min(self.max_report_secs))
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::from_config(&TrackingConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FlushOutcome {
    /// Total below the reporting minimum; nothing was sent
    Skipped { seconds: u64 },
    /// Report handed to a transport
    Sent { seconds: u64, via: TransportKind },
    /// Every transport failed; the total is dropped
    Failed { seconds: u64, reason: String },
}

impl FlushOutcome {
    pub fn was_sent(&self) -> bool {
        matches!(self, FlushOutcome::Sent { .. })
    }
}

pub struct DeliveryGuard {
    policy: DeliveryPolicy,
    best_effort: Arc<dyn Transport>,
    blocking: Arc<dyn Transport>,
}

impl DeliveryGuard {
    pub fn new(
        policy: DeliveryPolicy,
        best_effort: Arc<dyn Transport>,
        blocking: Arc<dyn Transport>,
    ) -> Self {
        Self {
            policy,
            best_effort,
            blocking,
        }
    }

    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Fold, filter, clamp and dispatch the timer's total, then reset it
    pub fn flush(&self, timer: &mut UsageTimer) -> FlushOutcome {
        let module = timer.module();
        let total = timer.take_accumulated();

        let Some(seconds) = self.policy.reportable_seconds(total) else {
            let seconds = total.num_seconds().max(0) as u64;
            tracing::debug!(module = %module, seconds, "Usage below reporting minimum");
            return FlushOutcome::Skipped { seconds };
        };

        let report = UsageReport { module, seconds };

        match self.dispatch(&report) {
            Ok(via) => {
                tracing::info!(module = %module, seconds, via = %via, "Flushed module usage");
                FlushOutcome::Sent { seconds, via }
            }
            Err(reason) => {
                tracing::warn!(module = %module, seconds, "Dropped module usage: {}", reason);
                FlushOutcome::Failed { seconds, reason }
            }
        }
    }

    fn dispatch(&self, report: &UsageReport) -> std::result::Result<TransportKind, String> {
        if self.best_effort.is_available() {
            match self.best_effort.send(report) {
                Ok(()) => return Ok(self.best_effort.kind()),
                Err(e) => {
                    tracing::debug!("Best-effort send refused, falling back: {}", e);
                }
            }
        }

        self.blocking
            .send(report)
            .map(|()| self.blocking.kind())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::TrackingError;
    use crate::module::TrackedModule;
    use parking_lot::Mutex;

    /// Transport that records what it was asked to send
    pub(crate) struct RecordingTransport {
        kind: TransportKind,
        available: bool,
        fail: bool,
        pub(crate) sent: Mutex<Vec<UsageReport>>,
    }

    impl RecordingTransport {
        pub(crate) fn new(kind: TransportKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                available: true,
                fail: false,
                sent: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn unavailable(kind: TransportKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                available: false,
                fail: false,
                sent: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(kind: TransportKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                available: true,
                fail: true,
                sent: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn count(&self) -> usize {
            self.sent.lock().len()
        }
    }

    impl Transport for RecordingTransport {
        fn kind(&self) -> TransportKind {
            self.kind
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn send(&self, report: &UsageReport) -> crate::Result<()> {
            self.sent.lock().push(*report);
            if self.fail {
                return Err(TrackingError::Rejected(500));
            }
            Ok(())
        }
    }

    fn timer(clock: &ManualClock) -> UsageTimer {
        UsageTimer::new(
            TrackedModule::ErrorBook,
            Duration::seconds(60),
            Arc::new(clock.clone()),
        )
    }

    #[test]
    fn test_below_minimum_sends_nothing() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::new(TransportKind::BestEffort);
        let blocking = RecordingTransport::new(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon.clone(), blocking.clone());

        clock.advance(Duration::seconds(4));
        let outcome = guard.flush(&mut timer);

        assert_eq!(outcome, FlushOutcome::Skipped { seconds: 4 });
        assert_eq!(beacon.count(), 0);
        assert_eq!(blocking.count(), 0);
        assert_eq!(timer.accumulated(), Duration::zero());
    }

    #[test]
    fn test_report_is_clamped() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::new(TransportKind::BestEffort);
        let blocking = RecordingTransport::new(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon.clone(), blocking);

        clock.advance(Duration::seconds(10_000));
        let outcome = guard.flush(&mut timer);

        assert_eq!(
            outcome,
            FlushOutcome::Sent {
                seconds: 7200,
                via: TransportKind::BestEffort
            }
        );
        assert_eq!(
            beacon.sent.lock().as_slice(),
            &[UsageReport {
                module: TrackedModule::ErrorBook,
                seconds: 7200
            }]
        );
    }

    #[test]
    fn test_second_flush_sends_nothing() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::new(TransportKind::BestEffort);
        let blocking = RecordingTransport::new(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon.clone(), blocking.clone());

        clock.advance(Duration::seconds(45));
        assert!(guard.flush(&mut timer).was_sent());
        assert_eq!(guard.flush(&mut timer), FlushOutcome::Skipped { seconds: 0 });

        assert_eq!(beacon.count() + blocking.count(), 1);
    }

    #[test]
    fn test_unavailable_best_effort_uses_blocking() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::unavailable(TransportKind::BestEffort);
        let blocking = RecordingTransport::new(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon.clone(), blocking.clone());

        clock.advance(Duration::seconds(30));
        let outcome = guard.flush(&mut timer);

        assert_eq!(
            outcome,
            FlushOutcome::Sent {
                seconds: 30,
                via: TransportKind::Blocking
            }
        );
        assert_eq!(beacon.count(), 0);
        assert_eq!(blocking.count(), 1);
    }

    #[test]
    fn test_refused_best_effort_falls_back() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::failing(TransportKind::BestEffort);
        let blocking = RecordingTransport::new(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon, blocking.clone());

        clock.advance(Duration::seconds(30));
        assert!(guard.flush(&mut timer).was_sent());
        assert_eq!(blocking.count(), 1);
    }

    #[test]
    fn test_failed_fallback_is_not_retried() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::unavailable(TransportKind::BestEffort);
        let blocking = RecordingTransport::failing(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon, blocking.clone());

        clock.advance(Duration::seconds(30));
        let outcome = guard.flush(&mut timer);
        assert!(matches!(outcome, FlushOutcome::Failed { seconds: 30, .. }));

        assert_eq!(guard.flush(&mut timer), FlushOutcome::Skipped { seconds: 0 });
        assert_eq!(blocking.count(), 1);
    }

    #[test]
    fn test_accumulates_across_pause_cycles() {
        let clock = ManualClock::default();
        let mut timer = timer(&clock);
        let beacon = RecordingTransport::new(TransportKind::BestEffort);
        let blocking = RecordingTransport::new(TransportKind::Blocking);
        let guard = DeliveryGuard::new(DeliveryPolicy::default(), beacon.clone(), blocking);

        clock.advance(Duration::seconds(20));
        timer.on_visibility_change(false);
        clock.advance(Duration::seconds(600));
        timer.on_visibility_change(true);
        clock.advance(Duration::seconds(15));

        assert_eq!(
            guard.flush(&mut timer),
            FlushOutcome::Sent {
                seconds: 35,
                via: TransportKind::BestEffort
            }
        );
    }
}

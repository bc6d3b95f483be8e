//! Report transports
//!
//! Two ways to get a usage report out while the page is going away:
//! - `BeaconTransport`: queue the POST on the async runtime and return at
//!   once; the request outlives the caller
//! - `BlockingTransport`: send synchronously and wait for the status, used
//!   when no runtime is available to carry a background send

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Handle;
use url::Url;

use crate::error::TrackingError;
use crate::module::TrackedModule;
use crate::Result;

/// Body of `POST /api/track_module`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub module: TrackedModule,
    pub seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    BestEffort,
    Blocking,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::BestEffort => write!(f, "best_effort"),
            TransportKind::Blocking => write!(f, "blocking"),
        }
    }
}

pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Whether the transport can dispatch right now
    fn is_available(&self) -> bool {
        true
    }

    /// Dispatch a report. For best-effort transports `Ok` means the send
    /// was queued, not that the server accepted it.
    fn send(&self, report: &UsageReport) -> Result<()>;
}

/// Fire-and-forget POST spawned on a captured tokio runtime
pub struct BeaconTransport {
    client: reqwest::Client,
    endpoint: Url,
    runtime: Option<Handle>,
}

impl BeaconTransport {
    /// Capture the runtime of the calling context, if any
    pub fn new(endpoint: Url) -> Self {
        Self::with_runtime(endpoint, Handle::try_current().ok())
    }

    pub fn with_runtime(endpoint: Url, runtime: Option<Handle>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            runtime,
        }
    }
}

impl Transport for BeaconTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::BestEffort
    }

    fn is_available(&self) -> bool {
        self.runtime.is_some()
    }

    fn send(&self, report: &UsageReport) -> Result<()> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| TrackingError::Unavailable("no async runtime".to_string()))?;

        let request = self.client.post(self.endpoint.clone()).json(report);
        let report = *report;

        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(module = %report.module, "Usage report delivered");
                }
                Ok(response) => {
                    tracing::warn!(
                        module = %report.module,
                        status = response.status().as_u16(),
                        "Usage report rejected"
                    );
                }
                Err(e) => {
                    tracing::warn!(module = %report.module, "Usage report failed: {}", e);
                }
            }
        });

        Ok(())
    }
}

/// Synchronous POST that waits for the response status. The request runs
/// on its own thread so the send is safe to call from inside an async
/// context, where `reqwest::blocking` must not create or drop its runtime.
pub struct BlockingTransport {
    endpoint: Url,
    timeout: Duration,
}

impl BlockingTransport {
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }
}

impl Transport for BlockingTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Blocking
    }

    fn send(&self, report: &UsageReport) -> Result<()> {
        let endpoint = self.endpoint.clone();
        let timeout = self.timeout;
        let report = *report;

        std::thread::spawn(move || post_blocking(endpoint, timeout, &report))
            .join()
            .map_err(|_| {
                TrackingError::Unavailable("blocking send thread panicked".to_string())
            })?
    }
}

fn post_blocking(endpoint: Url, timeout: Duration, report: &UsageReport) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;

    let response = client.post(endpoint).json(report).send()?;

    if !response.status().is_success() {
        return Err(TrackingError::Rejected(response.status().as_u16()));
    }

    Ok(())
}

use crate::errors::InterceptError;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

/// Fixed at construction; one breaker per registered route.
#[derive(Clone, Copy, Debug)]
pub struct BreakerConfig {
    pub call_timeout: Duration,
    pub error_threshold_pct: u8,
    pub reset_timeout: Duration,
    pub min_samples: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_millis(3000),
            error_threshold_pct: 50,
            reset_timeout: Duration::from_millis(10_000),
            min_samples: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakerEvent {
    Opened,
    HalfOpened,
    Closed,
}

/// Observability sink for breaker transitions.
pub trait BreakerSink: Send + Sync {
    fn transition(&self, event: BreakerEvent);
}

/// Default sink, mirroring the severity of each transition.
pub struct TracingSink;

impl BreakerSink for TracingSink {
    fn transition(&self, event: BreakerEvent) {
        match event {
            BreakerEvent::Opened => tracing::error!("circuit breaker is open"),
            BreakerEvent::HalfOpened => tracing::warn!("circuit breaker is half open"),
            BreakerEvent::Closed => tracing::info!("circuit breaker is closed"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum BreakerState {
    Closed,
    Open { since: Instant },
    /// A trial call is in flight; entering this state and claiming the
    /// probe slot happen atomically under the core lock.
    HalfOpen,
}

struct BreakerCore {
    state: BreakerState,
    attempted: u32,
    failed: u32,
}

enum Admission {
    Attempt { probe: bool },
    Reject,
}

/// Fault-tolerance wrapper around the downstream handler call. Statistics
/// and state are shared by every concurrent request routed through the same
/// instance; all transitions happen under one lock.
pub struct CircuitBreaker {
    config: BreakerConfig,
    core: Mutex<BreakerCore>,
    sink: Arc<dyn BreakerSink>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig, sink: Arc<dyn BreakerSink>) -> Self {
        Self {
            config,
            core: Mutex::new(BreakerCore {
                state: BreakerState::Closed,
                attempted: 0,
                failed: 0,
            }),
            sink,
        }
    }

    /// Run `fut` under the breaker. While Open the call is rejected without
    /// touching the handler; while HalfOpen a single probe is admitted.
    /// Recognized domain errors always surface unchanged; unrecognized
    /// failures while Closed are recoded as 503.
    pub async fn call<T, Fut>(&self, fut: Fut) -> Result<T, InterceptError>
    where
        Fut: Future<Output = Result<T, InterceptError>>,
    {
        let probe = match self.admit() {
            Admission::Reject => return Err(InterceptError::service_unavailable()),
            Admission::Attempt { probe } => probe,
        };

        // The timeout drops the in-flight future on expiry, so the
        // downstream work is cancelled rather than leaked.
        let outcome = match timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(InterceptError::timeout(&format!(
                "handler exceeded {}ms",
                self.config.call_timeout.as_millis()
            ))),
        };

        match outcome {
            Ok(value) => {
                self.record_success(probe);
                Ok(value)
            }
            Err(err) => {
                self.record_failure(probe);
                if probe || err.0.is_domain() {
                    Err(err)
                } else {
                    Err(InterceptError::service_unavailable_from(err.into_inner()))
                }
            }
        }
    }

    fn admit(&self) -> Admission {
        let mut event = None;
        let admission = {
            let mut core = self.core.lock();
            match core.state {
                BreakerState::Closed => Admission::Attempt { probe: false },
                BreakerState::Open { since } => {
                    if since.elapsed() >= self.config.reset_timeout {
                        core.state = BreakerState::HalfOpen;
                        event = Some(BreakerEvent::HalfOpened);
                        Admission::Attempt { probe: true }
                    } else {
                        Admission::Reject
                    }
                }
                // One trial call at a time.
                BreakerState::HalfOpen => Admission::Reject,
            }
        };
        if let Some(event) = event {
            self.sink.transition(event);
        }
        admission
    }

    fn record_success(&self, probe: bool) {
        let mut event = None;
        {
            let mut core = self.core.lock();
            if probe {
                core.state = BreakerState::Closed;
                core.attempted = 0;
                core.failed = 0;
                event = Some(BreakerEvent::Closed);
            } else {
                core.attempted += 1;
                if core.attempted >= self.config.min_samples {
                    core.attempted = 0;
                    core.failed = 0;
                }
            }
        }
        if let Some(event) = event {
            self.sink.transition(event);
        }
    }

    fn record_failure(&self, probe: bool) {
        let mut event = None;
        {
            let mut core = self.core.lock();
            if probe {
                core.state = BreakerState::Open {
                    since: Instant::now(),
                };
                core.attempted = 0;
                core.failed = 0;
                event = Some(BreakerEvent::Opened);
            } else {
                core.attempted += 1;
                core.failed += 1;
                let threshold = u64::from(self.config.error_threshold_pct);
                let reached = u64::from(core.failed) * 100 >= threshold * u64::from(core.attempted);
                if core.attempted >= self.config.min_samples && reached {
                    core.state = BreakerState::Open {
                        since: Instant::now(),
                    };
                    core.attempted = 0;
                    core.failed = 0;
                    event = Some(BreakerEvent::Opened);
                }
            }
        }
        if let Some(event) = event {
            self.sink.transition(event);
        }
    }
}

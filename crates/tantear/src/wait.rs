//! Condition-Wait Engine
//!
//! Polls a boolean-producing probe at a fixed interval until it holds or a
//! deadline elapses. Three outcomes are kept apart:
//!
//! - the condition became true ([`WaitOutcome::Satisfied`]);
//! - the condition stayed false until the budget ran out
//!   ([`WaitOutcome::TimedOut`]), a first-class outcome rather than an
//!   error;
//! - the condition could not be evaluated at all
//!   ([`WaitError::ProbeFailed`]), which terminates the wait immediately.
//!
//! Polling suspends the calling task cooperatively between attempts, and a
//! [`Cancellation`] flag is checked at the top of each iteration so an
//! aborted scenario stops polling within one interval.

use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::driver::DriverError;
use crate::reporter::{EventLevel, Reporter};
use crate::result::TantearError;

/// Default timeout for wait operations (10 seconds).
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (250ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// A side-effect-free boolean check, re-invoked while polling.
///
/// Probes must be idempotent; they may fail with a driver-level error, which
/// is distinct from the condition simply being false.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Report whether the condition currently holds.
    async fn check(&self) -> Result<bool, DriverError>;
}

/// A function-based probe.
pub struct FnProbe<F> {
    func: F,
}

impl<F> std::fmt::Debug for FnProbe<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProbe").finish_non_exhaustive()
    }
}

impl<F> FnProbe<F> {
    /// Wrap a closure producing a probe future.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> Probe for FnProbe<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, DriverError>> + Send,
{
    async fn check(&self) -> Result<bool, DriverError> {
        (self.func)().await
    }
}

/// Timeout/interval/description triple governing one poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSpec {
    /// Total time budget in milliseconds.
    pub timeout_ms: u64,
    /// Sleep between poll attempts in milliseconds.
    pub interval_ms: u64,
    /// Human-readable description used in failure reporting.
    pub description: String,
}

impl WaitSpec {
    /// Create a spec with default timeout and interval.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            description: description.into(),
        }
    }

    /// Set the timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds.
    #[must_use]
    pub const fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Timeout as a `Duration`; zero is clamped to one millisecond.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    /// Interval as a `Duration`; zero is clamped to one millisecond.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    /// An interval longer than the budget degenerates to a single probe.
    #[must_use]
    pub fn is_single_probe(&self) -> bool {
        self.interval() > self.timeout()
    }
}

/// Outcome of a wait. Timeout is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition became true.
    Satisfied {
        /// Wall-clock time since the first probe.
        elapsed: Duration,
    },
    /// The budget ran out with the condition still unmet.
    TimedOut {
        /// Last observed probe result (typically `false`).
        last_state: bool,
        /// Wall-clock time since the first probe.
        elapsed: Duration,
        /// Description from the wait spec, for diagnostics.
        description: String,
    },
}

impl WaitOutcome {
    /// Whether the condition was satisfied.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// Wall-clock time the wait took.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Satisfied { elapsed } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    /// Convert a timeout into an error, for callers that required the
    /// condition.
    pub fn require(self) -> Result<Duration, TantearError> {
        match self {
            Self::Satisfied { elapsed } => Ok(elapsed),
            Self::TimedOut {
                elapsed,
                description,
                ..
            } => Err(TantearError::ConditionTimeout {
                description,
                elapsed,
            }),
        }
    }
}

/// Failures that terminate a wait before its outcome is known.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The probe could not be evaluated; distinct from "condition false".
    #[error("condition {description:?} could not be evaluated after {elapsed:?}")]
    ProbeFailed {
        /// Description from the wait spec.
        description: String,
        /// Wall-clock time since the first probe.
        elapsed: Duration,
        /// The collaborator failure.
        #[source]
        source: DriverError,
    },

    /// The surrounding scenario was aborted.
    #[error("wait for {description:?} cancelled after {elapsed:?}")]
    Cancelled {
        /// Description from the wait spec.
        description: String,
        /// Wall-clock time since the first probe.
        elapsed: Duration,
    },
}

/// Advisory, cooperative cancellation flag.
///
/// Clones share the flag; the wait engine checks it at the top of each poll
/// iteration, so a cancelled wait returns within one interval of the signal.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    /// Create a fresh, uncancelled flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every clone.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The condition-wait engine.
///
/// Stateless apart from its reporter; every outcome (satisfied, timed out,
/// probe failure, cancellation) is recorded before being returned.
#[derive(Debug, Clone)]
pub struct Waiter {
    reporter: Reporter,
}

impl Waiter {
    /// Create a waiter reporting into the given stream.
    #[must_use]
    pub const fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// Poll `probe` until it holds or `spec`'s budget elapses.
    ///
    /// The first probe fires immediately; subsequent probes follow
    /// best-effort interval sleeps. An interval longer than the budget
    /// degenerates to a single probe.
    pub async fn wait<P>(
        &self,
        probe: &P,
        spec: &WaitSpec,
        cancel: &Cancellation,
    ) -> Result<WaitOutcome, WaitError>
    where
        P: Probe + ?Sized,
    {
        let start = Instant::now();
        let timeout = spec.timeout();
        let interval = spec.interval();
        self.reporter
            .debug(format!("waiting until {}", spec.description));

        loop {
            if cancel.is_cancelled() {
                let elapsed = start.elapsed();
                self.reporter.record(
                    EventLevel::Warn,
                    format!("wait for {} cancelled", spec.description),
                    Some(serde_json::json!({ "elapsed_ms": elapsed.as_millis() as u64 })),
                );
                return Err(WaitError::Cancelled {
                    description: spec.description.clone(),
                    elapsed,
                });
            }

            match probe.check().await {
                Ok(true) => {
                    let elapsed = start.elapsed();
                    self.reporter.record(
                        EventLevel::Debug,
                        format!("{} satisfied", spec.description),
                        Some(serde_json::json!({ "elapsed_ms": elapsed.as_millis() as u64 })),
                    );
                    return Ok(WaitOutcome::Satisfied { elapsed });
                }
                Ok(false) => {}
                Err(source) => {
                    let elapsed = start.elapsed();
                    self.reporter.record(
                        EventLevel::Error,
                        format!("{} could not be evaluated: {source}", spec.description),
                        Some(serde_json::json!({ "elapsed_ms": elapsed.as_millis() as u64 })),
                    );
                    return Err(WaitError::ProbeFailed {
                        description: spec.description.clone(),
                        elapsed,
                        source,
                    });
                }
            }

            if start.elapsed() >= timeout || spec.is_single_probe() {
                let elapsed = start.elapsed();
                self.reporter.record(
                    EventLevel::Warn,
                    format!("timed out waiting until {}", spec.description),
                    Some(serde_json::json!({
                        "elapsed_ms": elapsed.as_millis() as u64,
                        "timeout_ms": spec.timeout_ms,
                    })),
                );
                return Ok(WaitOutcome::TimedOut {
                    last_state: false,
                    elapsed,
                    description: spec.description.clone(),
                });
            }

            tokio::time::sleep(interval).await;
        }
    }
}

/// Wait for a predicate with the default interval and no cancellation.
///
/// Polling events go to a throwaway reporter and are not observable by the
/// caller; use [`Waiter::wait`] directly when the wait should feed a shared
/// event stream.
pub async fn wait_until<F, Fut>(
    predicate: F,
    timeout_ms: u64,
    description: impl Into<String>,
) -> Result<WaitOutcome, WaitError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, DriverError>> + Send,
{
    let waiter = Waiter::new(Reporter::new());
    let spec = WaitSpec::new(description).with_timeout(timeout_ms);
    let probe = FnProbe::new(predicate);
    waiter.wait(&probe, &spec, &Cancellation::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn always(value: bool) -> impl Probe {
        FnProbe::new(move || async move { Ok::<bool, DriverError>(value) })
    }

    fn fast_spec(description: &str, timeout_ms: u64, interval_ms: u64) -> WaitSpec {
        WaitSpec::new(description)
            .with_timeout(timeout_ms)
            .with_interval(interval_ms)
    }

    mod spec_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let spec = WaitSpec::new("header visible");
            assert_eq!(spec.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(spec.interval_ms, DEFAULT_POLL_INTERVAL_MS);
            assert_eq!(spec.description, "header visible");
        }

        #[test]
        fn test_builders() {
            let spec = WaitSpec::new("x").with_timeout(5000).with_interval(1000);
            assert_eq!(spec.timeout(), Duration::from_millis(5000));
            assert_eq!(spec.interval(), Duration::from_millis(1000));
        }

        #[test]
        fn test_zero_values_clamped() {
            let spec = WaitSpec::new("x").with_timeout(0).with_interval(0);
            assert_eq!(spec.timeout(), Duration::from_millis(1));
            assert_eq!(spec.interval(), Duration::from_millis(1));
        }

        #[test]
        fn test_single_probe_degeneration() {
            assert!(fast_spec("x", 50, 200).is_single_probe());
            assert!(!fast_spec("x", 200, 50).is_single_probe());
            assert!(!fast_spec("x", 50, 50).is_single_probe());
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_satisfied_accessors() {
            let outcome = WaitOutcome::Satisfied {
                elapsed: Duration::from_millis(120),
            };
            assert!(outcome.is_satisfied());
            assert_eq!(outcome.elapsed(), Duration::from_millis(120));
            assert_eq!(outcome.require().unwrap(), Duration::from_millis(120));
        }

        #[test]
        fn test_timed_out_require_is_error() {
            let outcome = WaitOutcome::TimedOut {
                last_state: false,
                elapsed: Duration::from_millis(5000),
                description: "dropdown expanded".into(),
            };
            assert!(!outcome.is_satisfied());
            let err = outcome.require().unwrap_err();
            assert!(err.to_string().contains("dropdown expanded"));
        }
    }

    mod engine_tests {
        use super::*;

        // start_paused: sleeps advance a virtual clock, so poll boundaries
        // land exactly and elapsed times are deterministic.

        #[tokio::test(start_paused = true)]
        async fn test_immediate_success() {
            let waiter = Waiter::new(Reporter::new());
            let outcome = waiter
                .wait(&always(true), &fast_spec("x", 100, 10), &Cancellation::new())
                .await
                .unwrap();
            assert!(outcome.is_satisfied());
            assert_eq!(outcome.elapsed(), Duration::ZERO);
        }

        #[tokio::test(start_paused = true)]
        async fn test_satisfied_at_next_poll_after_flip() {
            // flips true 320ms in; polls land on 100ms boundaries, so the
            // engine observes satisfaction at 400ms
            let start = Instant::now();
            let probe = FnProbe::new(move || {
                let flipped = start.elapsed() >= Duration::from_millis(320);
                async move { Ok::<bool, DriverError>(flipped) }
            });

            let waiter = Waiter::new(Reporter::new());
            let outcome = waiter
                .wait(&probe, &fast_spec("flip", 500, 100), &Cancellation::new())
                .await
                .unwrap();
            assert!(outcome.is_satisfied());
            assert_eq!(outcome.elapsed(), Duration::from_millis(400));
        }

        #[tokio::test(start_paused = true)]
        async fn test_never_true_times_out_at_the_budget() {
            let waiter = Waiter::new(Reporter::new());
            let outcome = waiter
                .wait(
                    &always(false),
                    &fast_spec("never", 100, 10),
                    &Cancellation::new(),
                )
                .await
                .unwrap();
            match outcome {
                WaitOutcome::TimedOut {
                    last_state,
                    elapsed,
                    ref description,
                } => {
                    assert!(!last_state);
                    assert_eq!(description, "never");
                    assert_eq!(elapsed, Duration::from_millis(100));
                }
                WaitOutcome::Satisfied { .. } => panic!("expected timeout"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_probe_error_terminates_immediately() {
            let probe = FnProbe::new(|| async {
                Err::<bool, _>(DriverError::Session {
                    message: "connection dropped".into(),
                })
            });
            let waiter = Waiter::new(Reporter::new());
            let err = waiter
                .wait(&probe, &fast_spec("broken", 5000, 100), &Cancellation::new())
                .await
                .unwrap_err();
            match err {
                WaitError::ProbeFailed {
                    description,
                    elapsed,
                    source,
                } => {
                    assert_eq!(description, "broken");
                    assert_eq!(elapsed, Duration::ZERO);
                    assert!(matches!(source, DriverError::Session { .. }));
                }
                WaitError::Cancelled { .. } => panic!("expected probe failure"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancellation_returns_within_one_interval() {
            let cancel = Cancellation::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                signal.cancel();
            });

            let waiter = Waiter::new(Reporter::new());
            let err = waiter
                .wait(&always(false), &fast_spec("slow", 5000, 20), &cancel)
                .await
                .unwrap_err();
            match err {
                WaitError::Cancelled { elapsed, .. } => {
                    // signal at 50ms, observed at the next 20ms poll boundary
                    assert!(elapsed <= Duration::from_millis(100));
                }
                WaitError::ProbeFailed { .. } => panic!("expected cancellation"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_single_probe_when_interval_exceeds_timeout() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let probe = FnProbe::new(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<bool, DriverError>(false)
                }
            });

            let waiter = Waiter::new(Reporter::new());
            let outcome = waiter
                .wait(&probe, &fast_spec("once", 50, 200), &Cancellation::new())
                .await
                .unwrap();
            assert!(!outcome.is_satisfied());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_outcomes_are_reported() {
            let reporter = Reporter::new();
            let waiter = Waiter::new(reporter.clone());
            let _ = waiter
                .wait(
                    &always(false),
                    &fast_spec("header visible", 30, 10),
                    &Cancellation::new(),
                )
                .await
                .unwrap();
            let warnings = reporter.messages_at(EventLevel::Warn);
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("header visible"));
        }
    }

    mod convenience_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_until_success() {
            let outcome = wait_until(|| async { Ok(true) }, 100, "ready")
                .await
                .unwrap();
            assert!(outcome.is_satisfied());
        }

        #[tokio::test]
        async fn test_wait_until_timeout() {
            let outcome = wait_until(|| async { Ok(false) }, 30, "never ready")
                .await
                .unwrap();
            assert!(!outcome.is_satisfied());
        }
    }

    mod cancellation_tests {
        use super::*;

        #[test]
        fn test_clones_share_flag() {
            let cancel = Cancellation::new();
            let clone = cancel.clone();
            assert!(!clone.is_cancelled());
            cancel.cancel();
            assert!(clone.is_cancelled());
        }
    }
}

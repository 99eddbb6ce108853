//! Verified actions
//!
//! A verified action wraps a UI effect with an optional precondition wait
//! before it and an optional postcondition wait after it. The effect runs at
//! most once; if the precondition never holds, the effect is not attempted,
//! and if the postcondition never holds afterwards, the failure says so
//! rather than pretending the click landed.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::driver::DriverError;
use crate::reporter::Reporter;
use crate::wait::{Cancellation, Probe, WaitError, WaitOutcome, WaitSpec, Waiter};

type Effect = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), DriverError>> + Send>;

struct WaitPhase {
    probe: Box<dyn Probe>,
    spec: WaitSpec,
}

/// A named effect guarded by optional pre- and postcondition waits.
pub struct ActionSpec {
    name: String,
    precondition: Option<WaitPhase>,
    effect: Effect,
    postcondition: Option<WaitPhase>,
}

impl std::fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSpec")
            .field("name", &self.name)
            .field("has_precondition", &self.precondition.is_some())
            .field("has_postcondition", &self.postcondition.is_some())
            .finish_non_exhaustive()
    }
}

impl ActionSpec {
    /// Create an action around an effect. The effect is consumed on the
    /// single attempt; actions are not retried.
    pub fn new<E, Fut>(name: impl Into<String>, effect: E) -> Self
    where
        E: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DriverError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            precondition: None,
            effect: Box::new(move || effect().boxed()),
            postcondition: None,
        }
    }

    /// Guard the effect behind a condition that must hold first.
    #[must_use]
    pub fn with_precondition(mut self, probe: impl Probe + 'static, spec: WaitSpec) -> Self {
        self.precondition = Some(WaitPhase {
            probe: Box::new(probe),
            spec,
        });
        self
    }

    /// Require a condition to hold after the effect before declaring success.
    #[must_use]
    pub fn with_postcondition(mut self, probe: impl Probe + 'static, spec: WaitSpec) -> Self {
        self.postcondition = Some(WaitPhase {
            probe: Box::new(probe),
            spec,
        });
        self
    }

    /// The action's name, used in reporting and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Successful completion of a verified action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The action's name.
    pub name: String,
    /// Total wall-clock time across all phases.
    pub elapsed: Duration,
}

/// A verified action failure, naming the phase that broke.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The precondition never held; the effect was not attempted.
    #[error("precondition {description:?} for action {name:?} not met after {elapsed:?}")]
    PreconditionNotMet {
        /// The action's name.
        name: String,
        /// Description from the precondition's wait spec.
        description: String,
        /// Wall-clock time spent waiting on the precondition.
        elapsed: Duration,
        /// Present when the wait itself broke rather than timing out.
        #[source]
        source: Option<WaitError>,
    },

    /// The effect ran but the postcondition never held afterwards.
    #[error("postcondition {description:?} for action {name:?} not met after {elapsed:?}")]
    PostconditionNotMet {
        /// The action's name.
        name: String,
        /// Description from the postcondition's wait spec.
        description: String,
        /// Wall-clock time spent waiting on the postcondition.
        elapsed: Duration,
        /// Present when the wait itself broke rather than timing out.
        #[source]
        source: Option<WaitError>,
    },

    /// The effect itself failed.
    #[error("effect of action {name:?} failed")]
    EffectFailed {
        /// The action's name.
        name: String,
        /// The collaborator failure.
        #[source]
        source: DriverError,
    },

    /// The surrounding scenario was aborted mid-action.
    #[error("action {name:?} cancelled")]
    Cancelled {
        /// The action's name.
        name: String,
    },
}

/// Executes verified actions, reporting each phase.
#[derive(Debug, Clone)]
pub struct ActionRunner {
    waiter: Waiter,
    reporter: Reporter,
}

impl ActionRunner {
    /// Create a runner whose waits and phase events feed `reporter`.
    #[must_use]
    pub fn new(reporter: Reporter) -> Self {
        Self {
            waiter: Waiter::new(reporter.clone()),
            reporter,
        }
    }

    /// Run precondition wait, effect, postcondition wait, in that order,
    /// stopping at the first phase that fails.
    pub async fn perform(
        &self,
        spec: ActionSpec,
        cancel: &Cancellation,
    ) -> Result<ActionOutcome, ActionError> {
        let start = Instant::now();
        let name = spec.name.clone();
        self.reporter.debug(format!("performing action {name}"));

        if let Some(phase) = &spec.precondition {
            match self.waiter.wait(phase.probe.as_ref(), &phase.spec, cancel).await {
                Ok(WaitOutcome::Satisfied { .. }) => {}
                Ok(WaitOutcome::TimedOut {
                    elapsed,
                    description,
                    ..
                }) => {
                    return Err(ActionError::PreconditionNotMet {
                        name,
                        description,
                        elapsed,
                        source: None,
                    });
                }
                Err(WaitError::Cancelled { .. }) => {
                    return Err(ActionError::Cancelled { name });
                }
                Err(err) => {
                    return Err(ActionError::PreconditionNotMet {
                        name,
                        description: phase.spec.description.clone(),
                        elapsed: start.elapsed(),
                        source: Some(err),
                    });
                }
            }
        }

        if let Err(source) = (spec.effect)().await {
            self.reporter
                .error(format!("effect of action {name} failed: {source}"));
            return Err(ActionError::EffectFailed { name, source });
        }

        if let Some(phase) = &spec.postcondition {
            match self.waiter.wait(phase.probe.as_ref(), &phase.spec, cancel).await {
                Ok(WaitOutcome::Satisfied { .. }) => {}
                Ok(WaitOutcome::TimedOut {
                    elapsed,
                    description,
                    ..
                }) => {
                    return Err(ActionError::PostconditionNotMet {
                        name,
                        description,
                        elapsed,
                        source: None,
                    });
                }
                Err(WaitError::Cancelled { .. }) => {
                    return Err(ActionError::Cancelled { name });
                }
                Err(err) => {
                    return Err(ActionError::PostconditionNotMet {
                        name,
                        description: phase.spec.description.clone(),
                        elapsed: start.elapsed(),
                        source: Some(err),
                    });
                }
            }
        }

        let elapsed = start.elapsed();
        self.reporter.debug(format!("action {name} completed"));
        Ok(ActionOutcome { name, elapsed })
    }
}

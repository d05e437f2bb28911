//! Timeout supervision for a single build step.
//!
//! Races the supervised task against a strategy-computed budget. An
//! in-budget completion reports the task's own verdict and never touches the
//! escalation chain; an overrun cancels the task, waits out a bounded grace
//! period, then walks the configured operations in order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use crate::api::{SupervisedTask, TimeoutOperation, TimeoutStrategy};
use crate::error::{ConfigError, TaskError};
use crate::run::Run;
use crate::state_machine;
use crate::types::{BuildResult, ChainAction, Outcome, Phase};

/// Floor applied to every strategy-computed budget.
pub const DEFAULT_MINIMUM_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Budget used when the strategy cannot produce one.
pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// How long a cancelled task may keep running before it is abandoned.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Host-supplied supervision settings.
///
/// `minimum_timeout` replaces the original product's process-wide mutable
/// threshold: every budget is raised to this floor, and tests lower it to
/// run with short timeouts.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub minimum_timeout: Duration,
    pub fallback_timeout: Duration,
    pub grace_period: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            minimum_timeout: DEFAULT_MINIMUM_TIMEOUT,
            fallback_timeout: DEFAULT_FALLBACK_TIMEOUT,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl SupervisorConfig {
    /// Validates the configuration the host handed over.
    ///
    /// # Errors
    /// Rejects a zero minimum floor and a fallback budget below the floor.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.minimum_timeout.is_zero() {
            return Err(ConfigError::ZeroMinimumTimeout);
        }
        if self.fallback_timeout < self.minimum_timeout {
            return Err(ConfigError::FallbackBelowMinimum {
                minimum: self.minimum_timeout,
                fallback: self.fallback_timeout,
            });
        }
        Ok(self)
    }

    /// Raises a strategy-computed budget to the configured floor.
    pub fn clamp_to_floor(&self, requested: Duration) -> Duration {
        requested.max(self.minimum_timeout)
    }
}

/// Supervises build steps under a time budget.
pub struct TimeoutExecutor {
    config: SupervisorConfig,
}

impl TimeoutExecutor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Runs one build step under supervision and reports its terminal
    /// classification.
    ///
    /// Total: strategy failures, task failures, and operation failures all
    /// terminate in a well-defined [`Outcome`]; nothing is surfaced to the
    /// caller as an error or a hang.
    #[instrument(level = "debug", skip_all, fields(run = ?run.id(), task = task.name()))]
    pub async fn supervise(
        &self,
        run: &Arc<Run>,
        task: Arc<dyn SupervisedTask>,
        strategy: &dyn TimeoutStrategy,
        operations: &[Arc<dyn TimeoutOperation>],
    ) -> Outcome {
        let mut phase = Phase::Pending;
        let budget = self.resolve_budget(run, strategy);

        let cancel = CancellationToken::new();
        let mut handle = spawn_task(run, task, cancel.child_token());
        advance(&mut phase, Phase::Running);

        let outcome = tokio::select! {
            // Completion is polled first: a task observed finished at the
            // same instant the timer fires is an in-budget task and must not
            // be escalated.
            biased;
            joined = &mut handle => {
                advance(&mut phase, Phase::CompletedOk);
                settle_in_budget(run, joined)
            }
            () = tokio::time::sleep(budget) => {
                advance(&mut phase, Phase::TimedOut);
                run.log()
                    .append(format!("Build step timed out after {}ms", budget.as_millis()));
                cancel.cancel();
                self.await_task_stop(run, handle).await;
                advance(&mut phase, Phase::Escalating);
                self.escalate(run, operations).await
            }
        };

        advance(&mut phase, Phase::Terminated);
        debug!(?outcome, "supervision finished");
        outcome
    }

    /// Asks the strategy for a budget, substituting the fallback on failure
    /// and raising the result to the minimum floor.
    fn resolve_budget(&self, run: &Run, strategy: &dyn TimeoutStrategy) -> Duration {
        let requested = match strategy.timeout_for(run) {
            Ok(requested) => requested,
            Err(err) => {
                warn!(
                    strategy = strategy.name(),
                    %err,
                    fallback_ms = self.config.fallback_timeout.as_millis() as u64,
                    "strategy failed to produce a budget, using fallback"
                );
                self.config.fallback_timeout
            }
        };

        let budget = self.config.clamp_to_floor(requested);
        if budget > requested {
            debug!(
                requested_ms = requested.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "budget raised to the minimum floor"
            );
        }
        budget
    }

    /// Gives the cancelled task one grace period to stop, then abandons it.
    ///
    /// Dropping the handle detaches the task; it keeps running in the
    /// background while escalation proceeds. Cancellation stays cooperative,
    /// the task is never forcibly aborted.
    async fn await_task_stop(&self, run: &Run, handle: JoinHandle<Result<bool, TaskError>>) {
        match tokio::time::timeout(self.config.grace_period, handle).await {
            Ok(_) => debug!("task stopped after cancellation"),
            Err(_) => {
                warn!(
                    grace_ms = self.config.grace_period.as_millis() as u64,
                    "task ignored cancellation within the grace period, abandoning it"
                );
                run.log()
                    .append("Build step did not stop after interruption, abandoning it");
            }
        }
    }

    /// Walks the operation chain in configured order, then classifies.
    async fn escalate(&self, run: &Run, operations: &[Arc<dyn TimeoutOperation>]) -> Outcome {
        for op in operations {
            match op.perform(run).await {
                Ok(ChainAction::Continue) => {
                    debug!(operation = op.name(), "operation completed, chain continues");
                }
                Ok(ChainAction::Stop) => {
                    debug!(operation = op.name(), "operation ended the chain");
                    break;
                }
                Err(err) => {
                    error!(operation = op.name(), %err, "operation failed, halting chain");
                    run.log()
                        .append(format!("Timeout operation {} failed: {err}", op.name()));
                    break;
                }
            }
        }

        match run.result() {
            BuildResult::Failure | BuildResult::Unstable => Outcome::Failure,
            BuildResult::Aborted => Outcome::Aborted,
            _ => {
                // No operation requested a terminal disposition.
                run.set_result(BuildResult::Aborted);
                Outcome::Aborted
            }
        }
    }
}

fn spawn_task(
    run: &Arc<Run>,
    task: Arc<dyn SupervisedTask>,
    cancel: CancellationToken,
) -> JoinHandle<Result<bool, TaskError>> {
    let run = Arc::clone(run);
    tokio::spawn(async move { task.perform(run, cancel).await })
}

/// Reports the task's own verdict for a completion inside the budget.
fn settle_in_budget(run: &Run, joined: Result<Result<bool, TaskError>, JoinError>) -> Outcome {
    match joined {
        Ok(Ok(true)) => {
            run.set_result(BuildResult::Success);
            Outcome::Success
        }
        Ok(Ok(false)) => {
            run.set_result(BuildResult::Failure);
            Outcome::Failure
        }
        Ok(Err(err)) => {
            error!(%err, "build step raised instead of returning a verdict");
            run.log().append(format!("Build step failed: {err}"));
            run.set_result(BuildResult::Failure);
            Outcome::Failure
        }
        Err(join_err) => {
            error!(%join_err, "build step panicked");
            run.log().append("Build step panicked");
            run.set_result(BuildResult::Failure);
            Outcome::Failure
        }
    }
}

fn advance(phase: &mut Phase, to: Phase) {
    debug_assert!(
        state_machine::validate_transition(*phase, to).is_ok(),
        "illegal supervision phase transition: {phase:?} -> {to:?}"
    );
    *phase = to;
}

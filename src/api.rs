use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{OperationError, StrategyError, TaskError};
use crate::run::Run;
use crate::types::ChainAction;

/// The protected unit of work.
///
/// Runs on its own tokio task and must select on the cancellation token. A
/// task that ignores it keeps running detached after the grace period: a
/// resource leak at the host's expense, never a supervisor hang.
#[async_trait::async_trait]
pub trait SupervisedTask: Send + Sync {
    fn name(&self) -> &'static str;

    /// Performs the work, returning its own success/failure verdict.
    ///
    /// # Errors
    /// An `Err` means the step raised rather than completing; the supervisor
    /// reports a failure and never runs the escalation chain for it.
    async fn perform(&self, run: Arc<Run>, cancel: CancellationToken) -> Result<bool, TaskError>;
}

/// Policy computing how long a given run may take.
///
/// Pure with respect to the run: no side effects beyond reading its state,
/// though the value may depend on live data such as the wall clock.
pub trait TimeoutStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    /// An `Err` is recovered by the supervisor, which substitutes its
    /// configured fallback budget.
    fn timeout_for(&self, run: &Run) -> Result<Duration, StrategyError>;
}

/// A named escalation action executed when the deadline is exceeded.
#[async_trait::async_trait]
pub trait TimeoutOperation: Send + Sync {
    fn name(&self) -> &'static str;

    /// Acts on the run and reports whether the chain keeps going.
    ///
    /// # Errors
    /// An `Err` halts the chain; the run result stays at whatever earlier
    /// operations set.
    async fn perform(&self, run: &Run) -> Result<ChainAction, OperationError>;
}

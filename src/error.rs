use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::types::Phase;

/// Rejected host configuration.
///
/// The only error this crate ever returns to the caller; everything that can
/// go wrong during supervision itself terminates in an [`crate::Outcome`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum timeout must be positive")]
    ZeroMinimumTimeout,
    #[error("fallback timeout {fallback:?} is below the minimum floor {minimum:?}")]
    FallbackBelowMinimum {
        minimum: Duration,
        fallback: Duration,
    },
}

/// A strategy could not produce a budget.
///
/// Recovered inside the supervisor by substituting the configured fallback;
/// never surfaced as a build failure.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("timeout input unavailable: {0}")]
    Unavailable(String),
    #[error("deadline {0:?} already passed")]
    DeadlinePassed(SystemTime),
}

/// The supervised task raised instead of returning an outcome.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("build step failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// An escalation operation raised mid-chain.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("operation {operation} failed: {reason}")]
    Failed {
        operation: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("illegal phase transition: {from:?} -> {to:?}")]
    IllegalTransition { from: Phase, to: Phase },
}

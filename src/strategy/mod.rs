//! Timeout strategies.
//!
//! Each strategy computes the budget a run is allowed before the supervisor
//! escalates. History-based policies (elastic, likely-stuck) live outside
//! this crate; the host selects a strategy through [`StrategyConfig`].

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::api::TimeoutStrategy;
use crate::error::StrategyError;
use crate::run::Run;

/// A constant, configuration-supplied budget.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeoutStrategy {
    timeout: Duration,
}

impl FixedTimeoutStrategy {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60))
    }
}

impl TimeoutStrategy for FixedTimeoutStrategy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn timeout_for(&self, _run: &Run) -> Result<Duration, StrategyError> {
        Ok(self.timeout)
    }
}

/// Budget is the wall-clock time remaining until a fixed deadline.
///
/// A deadline already in the past is a strategy failure; the supervisor then
/// falls back to its configured budget rather than timing out immediately.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineTimeoutStrategy {
    deadline: SystemTime,
}

impl DeadlineTimeoutStrategy {
    pub fn new(deadline: SystemTime) -> Self {
        Self { deadline }
    }
}

impl TimeoutStrategy for DeadlineTimeoutStrategy {
    fn name(&self) -> &'static str {
        "deadline"
    }

    fn timeout_for(&self, _run: &Run) -> Result<Duration, StrategyError> {
        self.deadline
            .duration_since(SystemTime::now())
            .map_err(|_| StrategyError::DeadlinePassed(self.deadline))
    }
}

/// Host-facing strategy selection, deserialized from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum StrategyConfig {
    Fixed { timeout_ms: u64 },
    Deadline { deadline_epoch_ms: u64 },
}

impl StrategyConfig {
    pub fn build(&self) -> Arc<dyn TimeoutStrategy> {
        match *self {
            StrategyConfig::Fixed { timeout_ms } => {
                Arc::new(FixedTimeoutStrategy::from_millis(timeout_ms))
            }
            StrategyConfig::Deadline { deadline_epoch_ms } => Arc::new(
                DeadlineTimeoutStrategy::new(
                    SystemTime::UNIX_EPOCH + Duration::from_millis(deadline_epoch_ms),
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_returns_the_configured_budget() {
        let run = Run::new();
        let strategy = FixedTimeoutStrategy::from_millis(500);
        assert_eq!(strategy.timeout_for(&run).unwrap(), Duration::from_millis(500));

        let strategy = FixedTimeoutStrategy::from_minutes(3);
        assert_eq!(strategy.timeout_for(&run).unwrap(), Duration::from_secs(180));
    }

    #[test]
    fn future_deadline_yields_the_remaining_time() {
        let run = Run::new();
        let strategy = DeadlineTimeoutStrategy::new(SystemTime::now() + Duration::from_secs(60));
        let budget = strategy.timeout_for(&run).unwrap();
        assert!(budget <= Duration::from_secs(60));
        assert!(budget > Duration::from_secs(50));
    }

    #[test]
    fn past_deadline_is_a_strategy_failure() {
        let run = Run::new();
        let strategy = DeadlineTimeoutStrategy::new(SystemTime::now() - Duration::from_secs(1));
        assert!(strategy.timeout_for(&run).is_err());
    }

    #[test]
    fn config_builds_the_selected_strategy() {
        let config: StrategyConfig =
            serde_json::from_str(r#"{ "strategy": "fixed", "timeout_ms": 500 }"#).unwrap();
        assert_eq!(config, StrategyConfig::Fixed { timeout_ms: 500 });

        let strategy = config.build();
        assert_eq!(strategy.name(), "fixed");
        assert_eq!(
            strategy.timeout_for(&Run::new()).unwrap(),
            Duration::from_millis(500)
        );
    }
}

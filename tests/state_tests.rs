use std::time::Duration;

use proptest::prelude::*;

use buildguard::state_machine::{allowed_transitions, validate_transition};
use buildguard::types::Phase;
use buildguard::SupervisorConfig;

#[test]
fn pending_only_starts_running() {
    assert!(validate_transition(Phase::Pending, Phase::Running).is_ok());
    assert!(validate_transition(Phase::Pending, Phase::Escalating).is_err());
    assert!(validate_transition(Phase::Pending, Phase::Terminated).is_err());
}

#[test]
fn running_resolves_to_completion_or_timeout() {
    assert!(validate_transition(Phase::Running, Phase::CompletedOk).is_ok());
    assert!(validate_transition(Phase::Running, Phase::TimedOut).is_ok());
    assert!(validate_transition(Phase::Running, Phase::Terminated).is_err());
}

#[test]
fn timed_out_must_escalate_before_terminating() {
    assert!(validate_transition(Phase::TimedOut, Phase::Escalating).is_ok());
    assert!(validate_transition(Phase::TimedOut, Phase::Terminated).is_err());
    assert!(validate_transition(Phase::Escalating, Phase::Terminated).is_ok());
}

#[test]
fn terminated_is_final() {
    assert!(allowed_transitions(Phase::Terminated).is_empty());
}

fn any_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Pending),
        Just(Phase::Running),
        Just(Phase::CompletedOk),
        Just(Phase::TimedOut),
        Just(Phase::Escalating),
        Just(Phase::Terminated),
    ]
}

proptest! {
    #[test]
    fn prop_validate_agrees_with_allowed(from in any_phase(), to in any_phase()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_budget_never_drops_below_the_floor(requested_ms in 0u64..10_000_000) {
        let config = SupervisorConfig {
            minimum_timeout: Duration::from_millis(100),
            fallback_timeout: Duration::from_millis(500),
            grace_period: Duration::from_millis(50),
        };

        let budget = config.clamp_to_floor(Duration::from_millis(requested_ms));

        prop_assert!(budget >= config.minimum_timeout);
        prop_assert_eq!(budget, Duration::from_millis(requested_ms.max(100)));
    }
}

use crate::error::StateMachineError;
use crate::types::Phase;

/// Validates a supervision phase transition.
pub fn validate_transition(from: Phase, to: Phase) -> Result<(), StateMachineError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(StateMachineError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: Phase) -> Vec<Phase> {
    use Phase::*;
    match from {
        Pending => vec![Running],
        Running => vec![CompletedOk, TimedOut],
        CompletedOk => vec![Terminated],
        TimedOut => vec![Escalating],
        Escalating => vec![Terminated],
        Terminated => vec![],
    }
}

fn allowed(from: Phase, to: Phase) -> bool {
    allowed_transitions(from).into_iter().any(|p| p == to)
}

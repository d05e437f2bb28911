use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// The run's mutable result field; `Unknown` until some writer classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildResult {
    Unknown,
    Success,
    Unstable,
    Failure,
    Aborted,
}

impl BuildResult {
    pub fn is_set(self) -> bool {
        !matches!(self, BuildResult::Unknown)
    }

    /// Whether an escalation operation has requested a final disposition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BuildResult::Unstable | BuildResult::Failure | BuildResult::Aborted
        )
    }
}

/// Terminal classification reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
    Aborted,
}

impl Outcome {
    /// Maps a run result to the outcome the host is told about; `Unstable`
    /// counts as a failure.
    pub fn classify(result: BuildResult) -> Option<Outcome> {
        match result {
            BuildResult::Success => Some(Outcome::Success),
            BuildResult::Unstable | BuildResult::Failure => Some(Outcome::Failure),
            BuildResult::Aborted => Some(Outcome::Aborted),
            BuildResult::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Running,
    CompletedOk,
    TimedOut,
    Escalating,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainAction {
    Continue,
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_unstable_to_failure() {
        assert_eq!(Outcome::classify(BuildResult::Success), Some(Outcome::Success));
        assert_eq!(Outcome::classify(BuildResult::Unstable), Some(Outcome::Failure));
        assert_eq!(Outcome::classify(BuildResult::Failure), Some(Outcome::Failure));
        assert_eq!(Outcome::classify(BuildResult::Aborted), Some(Outcome::Aborted));
        assert_eq!(Outcome::classify(BuildResult::Unknown), None);
    }

    #[test]
    fn unknown_is_neither_set_nor_terminal() {
        assert!(!BuildResult::Unknown.is_set());
        assert!(!BuildResult::Unknown.is_terminal());
        assert!(BuildResult::Success.is_set());
        assert!(!BuildResult::Success.is_terminal());
        assert!(BuildResult::Aborted.is_terminal());
    }
}

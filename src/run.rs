use parking_lot::Mutex;

use crate::logging::BuildLog;
use crate::types::{BuildResult, RunId};

/// Handle to the build/job in progress.
///
/// Created and owned by the host before supervision begins and outliving it;
/// the engine only reads and mutates the result field and appends to the log
/// sink. Shared into the supervised task via `Arc`.
#[derive(Debug)]
pub struct Run {
    id: RunId,
    result: Mutex<BuildResult>,
    log: BuildLog,
}

impl Run {
    pub fn new() -> Self {
        Self {
            id: RunId::new(),
            result: Mutex::new(BuildResult::Unknown),
            log: BuildLog::new(),
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn result(&self) -> BuildResult {
        *self.result.lock()
    }

    pub fn set_result(&self, result: BuildResult) {
        *self.result.lock() = result;
    }

    /// Sets the result only when no earlier writer has; returns whether the
    /// write happened.
    pub fn set_result_if_unset(&self, result: BuildResult) -> bool {
        let mut guard = self.result.lock();
        if guard.is_set() {
            false
        } else {
            *guard = result;
            true
        }
    }

    pub fn log(&self) -> &BuildLog {
        &self.log
    }
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

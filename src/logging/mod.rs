use parking_lot::Mutex;

/// Append-only narrative log for a single run.
///
/// The supervised task and the escalation operations write progress lines
/// here; the host streams or stores them. Entries are never reordered or
/// removed.
#[derive(Debug, Default)]
pub struct BuildLog {
    lines: Mutex<Vec<String>>,
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, line: impl Into<String>) {
        self.lines.lock().push(line.into());
    }

    /// Snapshot of all lines appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

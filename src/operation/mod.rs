//! Escalation operations.
//!
//! Executed by the supervisor, strictly in configured order, only after a
//! timeout. Each operation acts on the run and reports whether the chain
//! keeps going; the host selects and orders them through
//! [`OperationConfig`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::TimeoutOperation;
use crate::error::OperationError;
use crate::run::Run;
use crate::types::{BuildResult, ChainAction};

/// Marks the run aborted, unless an earlier operation already classified it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOperation;

#[async_trait::async_trait]
impl TimeoutOperation for AbortOperation {
    fn name(&self) -> &'static str {
        "abort"
    }

    async fn perform(&self, run: &Run) -> Result<ChainAction, OperationError> {
        if run.set_result_if_unset(BuildResult::Aborted) {
            run.log().append("Aborting the build");
        }
        Ok(ChainAction::Stop)
    }
}

/// Marks the run failed, overriding any earlier classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailOperation;

#[async_trait::async_trait]
impl TimeoutOperation for FailOperation {
    fn name(&self) -> &'static str {
        "fail"
    }

    async fn perform(&self, run: &Run) -> Result<ChainAction, OperationError> {
        run.set_result(BuildResult::Failure);
        run.log().append("Marking the build as failed");
        Ok(ChainAction::Stop)
    }
}

/// Appends a configured message to the run log and lets the chain continue.
#[derive(Debug, Clone)]
pub struct WriteLogOperation {
    message: String,
}

impl WriteLogOperation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait::async_trait]
impl TimeoutOperation for WriteLogOperation {
    fn name(&self) -> &'static str {
        "write-log"
    }

    async fn perform(&self, run: &Run) -> Result<ChainAction, OperationError> {
        run.log().append(self.message.clone());
        Ok(ChainAction::Continue)
    }
}

/// Host-facing operation selection, deserialized from configuration.
///
/// The configured order is the execution order; an empty list means the
/// supervisor's default abort behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum OperationConfig {
    Abort,
    Fail,
    WriteLog { message: String },
}

impl OperationConfig {
    pub fn build(&self) -> Arc<dyn TimeoutOperation> {
        match self {
            OperationConfig::Abort => Arc::new(AbortOperation),
            OperationConfig::Fail => Arc::new(FailOperation),
            OperationConfig::WriteLog { message } => {
                Arc::new(WriteLogOperation::new(message.clone()))
            }
        }
    }

    pub fn build_chain(configs: &[OperationConfig]) -> Vec<Arc<dyn TimeoutOperation>> {
        configs.iter().map(OperationConfig::build).collect()
    }
}

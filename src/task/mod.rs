use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::SupervisedTask;
use crate::error::TaskError;
use crate::run::Run;

/// Adapts an async closure into a named [`SupervisedTask`].
///
/// The closure receives the shared run handle and a per-invocation
/// cancellation token and is expected to select on the token.
pub struct FnTask<F> {
    name: &'static str,
    f: F,
}

impl<F, Fut> FnTask<F>
where
    F: Fn(Arc<Run>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, TaskError>> + Send + 'static,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    pub fn arc(name: &'static str, f: F) -> Arc<dyn SupervisedTask> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait::async_trait]
impl<F, Fut> SupervisedTask for FnTask<F>
where
    F: Fn(Arc<Run>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, TaskError>> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn perform(&self, run: Arc<Run>, cancel: CancellationToken) -> Result<bool, TaskError> {
        (self.f)(run, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_runs_with_the_shared_run() {
        let task = FnTask::arc("echo", |run: Arc<Run>, _cancel| async move {
            run.log().append("ran");
            Ok(true)
        });

        let run = Arc::new(Run::new());
        let outcome = task
            .perform(Arc::clone(&run), CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome);
        assert_eq!(task.name(), "echo");
        assert!(run.log().contains("ran"));
    }
}

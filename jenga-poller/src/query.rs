//! Status query collaborator

use std::future::Future;

use async_trait::async_trait;
use jenga_core::domain::job::JobHandle;
use serde_json::Value;

/// Fetches the raw status body of a job
///
/// Errors are treated by the poller as transient faults: they are logged and
/// polling continues. Implemented for any `Fn(JobHandle) -> impl Future`.
#[async_trait]
pub trait StatusQuery: Send + Sync + 'static {
    async fn query_status(&self, handle: &JobHandle) -> anyhow::Result<Value>;
}

#[async_trait]
impl<F, Fut> StatusQuery for F
where
    F: Fn(JobHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn query_status(&self, handle: &JobHandle) -> anyhow::Result<Value> {
        (self)(handle.clone()).await
    }
}

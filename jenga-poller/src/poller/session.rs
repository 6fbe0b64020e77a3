//! Handles returned to the caller of [`JobPoller::start`](super::JobPoller::start)

use std::sync::Arc;

use jenga_core::domain::job::JobHandle;
use jenga_core::domain::outcome::PollOutcome;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::PollReport;
use crate::error::PollError;
use crate::registry::RegistryLease;

/// Stops a poll loop from anywhere
///
/// Cloneable so teardown code (signal handlers, view drop hooks) can cancel
/// without owning the session. Cancelling after resolution does nothing.
#[derive(Debug, Clone)]
pub struct PollCanceller {
    token: CancellationToken,
    lease: Arc<RegistryLease>,
}

impl PollCanceller {
    pub(crate) fn new(token: CancellationToken, lease: Arc<RegistryLease>) -> Self {
        Self { token, lease }
    }

    /// Stops polling and frees the job id immediately
    ///
    /// The loop resolves with [`PollOutcome::Cancelled`] unless it already
    /// resolved with something else.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!("Cancelling poll loop");
        }
        self.token.cancel();
        self.lease.release();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A live poll loop for one job
///
/// Await [`outcome`](Self::outcome) or [`report`](Self::report) for the
/// result. Dropping the session, or the future returned by either method,
/// before resolution cancels the loop.
#[derive(Debug)]
pub struct PollSession {
    handle: JobHandle,
    canceller: PollCanceller,
    join: JoinHandle<PollReport>,
}

impl PollSession {
    pub(crate) fn new(
        handle: JobHandle,
        canceller: PollCanceller,
        join: JoinHandle<PollReport>,
    ) -> Self {
        Self {
            handle,
            canceller,
            join,
        }
    }

    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    /// True once the loop has resolved
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    pub fn canceller(&self) -> PollCanceller {
        self.canceller.clone()
    }

    /// Waits for the terminal outcome
    pub async fn outcome(self) -> Result<PollOutcome, PollError> {
        Ok(self.report().await?.outcome)
    }

    /// Waits for the terminal outcome together with attempt diagnostics
    pub async fn report(mut self) -> Result<PollReport, PollError> {
        let report = (&mut self.join).await?;
        Ok(report)
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        if !self.join.is_finished() {
            self.canceller.cancel();
        }
    }
}

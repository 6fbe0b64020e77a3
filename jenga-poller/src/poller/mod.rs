//! Job poller
//!
//! Drives one poll loop per job until it succeeds, fails, runs out of time
//! or is cancelled. Each loop runs in its own task and owns its timer, its
//! in-flight query and its registry entry; all three are torn down on every
//! exit path.

mod session;
mod state;

pub use session::{PollCanceller, PollSession};

use std::sync::Arc;
use std::time::Duration;

use jenga_core::domain::job::JobHandle;
use jenga_core::domain::outcome::PollOutcome;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::error::PollError;
use crate::policy::PollingPolicy;
use crate::query::StatusQuery;
use crate::registry::{PollerRegistry, RegistryLease};
use state::PollerState;

/// Snapshot passed to the progress callback after each non-terminal attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Terminal outcome plus diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    /// Status queries issued, including ones that failed
    pub attempts: u32,
    /// Time from the first query to resolution
    pub elapsed: Duration,
}

type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// Starts and tracks poll loops
///
/// Cheap to clone; clones share the registry and the progress callback.
#[derive(Clone)]
pub struct JobPoller {
    registry: PollerRegistry,
    progress: Option<ProgressFn>,
}

impl JobPoller {
    /// Creates a poller that records live loops in `registry`
    pub fn new(registry: PollerRegistry) -> Self {
        Self {
            registry,
            progress: None,
        }
    }

    /// Calls `callback` once per attempt that leaves the job unresolved
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn registry(&self) -> &PollerRegistry {
        &self.registry
    }

    /// Starts polling `handle`
    ///
    /// Returns immediately; the first query is issued right away on a
    /// spawned task. Fails with [`PollError::AlreadyPolling`] if a live loop
    /// already tracks the same id, leaving that loop untouched.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<Q>(
        &self,
        handle: JobHandle,
        policy: PollingPolicy,
        query: Q,
    ) -> Result<PollSession, PollError>
    where
        Q: StatusQuery,
    {
        let lease = self
            .registry
            .lease(handle.id())
            .ok_or_else(|| PollError::AlreadyPolling(handle.id().to_string()))?;
        let lease = Arc::new(lease);
        let token = CancellationToken::new();

        let poll_loop = PollLoop {
            handle: handle.clone(),
            policy,
            query,
            token: token.clone(),
            lease: Arc::clone(&lease),
            progress: self.progress.clone(),
        };
        let join = tokio::spawn(poll_loop.run());

        Ok(PollSession::new(
            handle,
            PollCanceller::new(token, lease),
            join,
        ))
    }
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller")
            .field("registry", &self.registry)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Everything one spawned loop owns
struct PollLoop<Q> {
    handle: JobHandle,
    policy: PollingPolicy,
    query: Q,
    token: CancellationToken,
    lease: Arc<RegistryLease>,
    progress: Option<ProgressFn>,
}

impl<Q: StatusQuery> PollLoop<Q> {
    async fn run(self) -> PollReport {
        let mut state = PollerState::new();
        let started_at = Instant::now();
        state.begin(started_at);

        info!(
            "Polling job {} (interval: {:?}, budget: {:?})",
            self.handle,
            self.policy.interval(),
            self.policy.max_elapsed()
        );

        let expiry = time::sleep_until(started_at + self.policy.max_elapsed());
        tokio::pin!(expiry);

        let outcome = loop {
            let tick_started = Instant::now();
            let attempts = state.record_attempt();

            // The deadline also bounds a single slow query; losing the race
            // drops the in-flight request. A response that settles exactly
            // on the deadline is still classified.
            let response = tokio::select! {
                biased;
                _ = self.token.cancelled() => break PollOutcome::Cancelled,
                response = self.query.query_status(&self.handle) => response,
                _ = &mut expiry => break PollOutcome::TimedOut,
            };

            match response {
                Ok(raw) => {
                    if let Some(outcome) = classify(&raw).into_outcome() {
                        break outcome;
                    }
                    debug!("Job {} not finished yet (attempt {})", self.handle, attempts);
                }
                Err(e) => {
                    warn!(
                        "Status query for job {} failed (attempt {}): {:#}",
                        self.handle, attempts, e
                    );
                }
            }

            if let Some(progress) = &self.progress {
                progress(Progress {
                    attempts,
                    elapsed: state.elapsed(Instant::now()),
                });
            }

            // Measured from the start of the tick, so a query slower than the
            // interval is followed by the next one as soon as it settles.
            let next_tick = tick_started + self.policy.delay_after(attempts);

            tokio::select! {
                biased;
                _ = self.token.cancelled() => break PollOutcome::Cancelled,
                _ = &mut expiry => break PollOutcome::TimedOut,
                _ = time::sleep_until(next_tick) => {}
            }
        };

        if state.resolve() {
            self.lease.release();
        }

        let elapsed = state.elapsed(Instant::now());
        info!(
            "Job {} resolved as {} after {} attempt(s) in {:?}",
            self.handle,
            outcome.label(),
            state.attempts(),
            elapsed
        );

        PollReport {
            outcome,
            attempts: state.attempts(),
            elapsed,
        }
    }
}

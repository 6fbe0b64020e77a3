//! Error types for the poller

use std::time::Duration;

use thiserror::Error;

/// Invalid polling configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("poll interval must be greater than 0")]
    ZeroInterval,

    #[error("max elapsed ({max_elapsed:?}) must be at least the poll interval ({interval:?})")]
    BudgetShorterThanInterval {
        interval: Duration,
        max_elapsed: Duration,
    },

    #[error("backoff factor must be a finite number >= 1.0, got {0}")]
    InvalidBackoff(f64),

    #[error("max interval ({max_interval:?}) must be at least the poll interval ({interval:?})")]
    InvalidMaxInterval {
        interval: Duration,
        max_interval: Duration,
    },

    #[error("unknown jitter policy '{0}' (expected 'none' or 'equal')")]
    UnknownJitter(String),
}

/// Errors raised by [`JobPoller`](crate::JobPoller) and its sessions
#[derive(Debug, Error)]
pub enum PollError {
    /// A live loop already tracks this job id
    #[error("job {0} is already being polled")]
    AlreadyPolling(String),

    /// The loop task panicked or its runtime shut down
    #[error("poll task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

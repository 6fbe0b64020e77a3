//! Terminal outcomes of a polled job

use serde::{Deserialize, Serialize};

/// Final result of tracking a background job
///
/// Exactly one of these is produced per poll session. `Failed` and
/// `TimedOut` are deliberately distinct: a failed job should be retried,
/// a timed-out one may still finish on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    /// The job finished; `result` is `null` when it reported no payload
    Succeeded { result: serde_json::Value },
    /// The job reported failure
    Failed { reason: String },
    /// The wait budget ran out before a terminal status was seen
    TimedOut,
    /// The caller stopped tracking the job
    Cancelled,
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Succeeded { .. })
    }

    /// Short lowercase label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            PollOutcome::Succeeded { .. } => "succeeded",
            PollOutcome::Failed { .. } => "failed",
            PollOutcome::TimedOut => "timed_out",
            PollOutcome::Cancelled => "cancelled",
        }
    }
}

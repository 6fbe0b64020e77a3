//! Per-loop poller state

use std::time::Duration;

use tokio::time::Instant;

/// Lifecycle phase of one poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Polling,
    Resolved,
}

/// Mutable state owned by exactly one poll loop
#[derive(Debug)]
pub(crate) struct PollerState {
    phase: Phase,
    started_at: Option<Instant>,
    attempts: u32,
}

impl PollerState {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            started_at: None,
            attempts: 0,
        }
    }

    /// Idle -> Polling; records the start of the wall-clock budget
    pub(crate) fn begin(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Polling;
            self.started_at = Some(now);
        }
    }

    /// Counts a query about to be issued and returns the new total
    pub(crate) fn record_attempt(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Polling -> Resolved; returns false if the loop had already resolved
    pub(crate) fn resolve(&mut self) -> bool {
        let first = self.phase != Phase::Resolved;
        self.phase = Phase::Resolved;
        first
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state = PollerState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.elapsed(Instant::now()), Duration::ZERO);

        let start = Instant::now();
        state.begin(start);
        assert_eq!(state.phase(), Phase::Polling);
        assert_eq!(state.record_attempt(), 1);
        assert_eq!(state.record_attempt(), 2);
        assert_eq!(
            state.elapsed(start + Duration::from_secs(3)),
            Duration::from_secs(3)
        );

        assert!(state.resolve());
        assert!(!state.resolve());
        assert_eq!(state.phase(), Phase::Resolved);
        assert_eq!(state.attempts(), 2);
    }

    #[test]
    fn test_begin_is_only_honoured_once() {
        let mut state = PollerState::new();
        let start = Instant::now();
        state.begin(start);
        state.begin(start + Duration::from_secs(10));
        assert_eq!(
            state.elapsed(start + Duration::from_secs(10)),
            Duration::from_secs(10)
        );

        state.resolve();
        state.begin(start);
        assert_eq!(state.phase(), Phase::Resolved);
    }
}

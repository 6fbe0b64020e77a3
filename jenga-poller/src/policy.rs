//! Polling policy
//!
//! Defines how often a job is queried and how long the client is willing to
//! wait for it. The defaults match the estimate flow: a query every two
//! seconds, giving up after three minutes.

use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::error::PolicyError;

/// Randomization applied to each inter-poll delay
///
/// Spreads queries from many clients that started polling at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Exact delays
    #[default]
    None,
    /// delay/2 + random[0, delay/2]
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Equal => {
                let ms = delay.as_millis() as u64;
                let half = ms / 2;
                if half == 0 {
                    return delay;
                }
                let jitter = rand::rng().random_range(0..=half);
                Duration::from_millis(ms - half + jitter)
            }
        }
    }
}

impl FromStr for JitterPolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(JitterPolicy::None),
            "equal" => Ok(JitterPolicy::Equal),
            other => Err(PolicyError::UnknownJitter(other.to_string())),
        }
    }
}

/// Cadence and wall-clock budget for polling one job
///
/// A policy can only be obtained through [`PollingPolicy::new`] or the
/// builder, both of which validate it, so a `PollingPolicy` value always
/// allows at least one query before its budget runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct PollingPolicy {
    interval: Duration,
    max_elapsed: Duration,
    jitter: JitterPolicy,
    backoff_factor: f64,
    max_interval: Duration,
}

impl PollingPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(180);

    /// Fixed-interval policy
    pub fn new(interval: Duration, max_elapsed: Duration) -> Result<Self, PolicyError> {
        Self::builder()
            .interval(interval)
            .max_elapsed(max_elapsed)
            .build()
    }

    /// Convenience constructor taking milliseconds
    pub fn from_millis(interval_ms: u64, max_elapsed_ms: u64) -> Result<Self, PolicyError> {
        Self::new(
            Duration::from_millis(interval_ms),
            Duration::from_millis(max_elapsed_ms),
        )
    }

    pub fn builder() -> PollingPolicyBuilder {
        PollingPolicyBuilder::default()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    pub fn jitter(&self) -> JitterPolicy {
        self.jitter
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    /// Validates the policy
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.interval.is_zero() {
            return Err(PolicyError::ZeroInterval);
        }

        if self.max_elapsed < self.interval {
            return Err(PolicyError::BudgetShorterThanInterval {
                interval: self.interval,
                max_elapsed: self.max_elapsed,
            });
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(PolicyError::InvalidBackoff(self.backoff_factor));
        }

        if self.max_interval < self.interval {
            return Err(PolicyError::InvalidMaxInterval {
                interval: self.interval,
                max_interval: self.max_interval,
            });
        }

        Ok(())
    }

    /// Delay to wait after the `attempt`-th query (1-based) before the next one
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.interval.as_secs_f64() * self.backoff_factor.powi(exponent);

        let base = if scaled.is_finite() && scaled < self.max_interval.as_secs_f64() {
            Duration::from_secs_f64(scaled)
        } else {
            self.max_interval
        };

        self.jitter.apply(base)
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_elapsed: Self::DEFAULT_MAX_ELAPSED,
            jitter: JitterPolicy::None,
            backoff_factor: 1.0,
            max_interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Fluent builder for [`PollingPolicy`]
#[derive(Debug, Clone, Default)]
pub struct PollingPolicyBuilder {
    interval: Option<Duration>,
    max_elapsed: Option<Duration>,
    jitter: JitterPolicy,
    backoff_factor: Option<f64>,
    max_interval: Option<Duration>,
}

impl PollingPolicyBuilder {
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }

    pub fn jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Multiplies the delay by `factor` after every query, up to `max_interval`
    pub fn backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = Some(factor);
        self.max_interval = Some(max_interval);
        self
    }

    pub fn build(self) -> Result<PollingPolicy, PolicyError> {
        let interval = self.interval.unwrap_or(PollingPolicy::DEFAULT_INTERVAL);
        let policy = PollingPolicy {
            interval,
            max_elapsed: self.max_elapsed.unwrap_or(PollingPolicy::DEFAULT_MAX_ELAPSED),
            jitter: self.jitter,
            backoff_factor: self.backoff_factor.unwrap_or(1.0),
            max_interval: self.max_interval.unwrap_or(interval),
        };
        policy.validate()?;
        Ok(policy)
    }
}

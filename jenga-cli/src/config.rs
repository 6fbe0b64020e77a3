//! Configuration module
//!
//! Turns command-line arguments into a validated CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use jenga_poller::{JitterPolicy, PollingPolicy};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the estimates API
    pub api_url: String,

    /// How job status is polled while watching
    pub policy: PollingPolicy,
}

impl Config {
    /// Builds and validates the configuration
    pub fn new(
        api_url: String,
        poll_interval_ms: u64,
        max_wait_ms: u64,
        jitter: JitterPolicy,
    ) -> Result<Self> {
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        let policy = PollingPolicy::builder()
            .interval(Duration::from_millis(poll_interval_ms))
            .max_elapsed(Duration::from_millis(max_wait_ms))
            .jitter(jitter)
            .build()
            .context("Invalid polling configuration")?;

        Ok(Self { api_url, policy })
    }
}

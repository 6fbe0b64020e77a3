//! Jenga CLI
//!
//! Command-line interface for generating construction estimates through the
//! background job API.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use jenga_poller::JitterPolicy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jenga")]
#[command(about = "Jenga construction estimate CLI", long_about = None)]
struct Cli {
    /// Estimates API URL
    #[arg(long, env = "JENGA_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Delay between status queries while watching a job
    #[arg(long, env = "JENGA_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Give up watching after this long (the job keeps running server-side)
    #[arg(long, env = "JENGA_MAX_WAIT_MS", default_value_t = 180_000)]
    max_wait_ms: u64,

    /// Randomize poll delays: none or equal
    #[arg(long, env = "JENGA_POLL_JITTER", default_value = "none")]
    jitter: JitterPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jenga=info,jenga_poller=info,jenga_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(
        cli.api_url,
        cli.poll_interval_ms,
        cli.max_wait_ms,
        cli.jitter,
    )?;

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_watch_with_policy_flags() {
        let cli = Cli::try_parse_from([
            "jenga",
            "--poll-interval-ms",
            "1000",
            "--max-wait-ms",
            "5000",
            "--jitter",
            "equal",
            "estimate",
            "watch",
            "c0ffee",
        ])
        .unwrap();

        assert_eq!(cli.poll_interval_ms, 1000);
        assert_eq!(cli.max_wait_ms, 5000);
        assert_eq!(cli.jitter, JitterPolicy::Equal);
    }

    #[test]
    fn test_unknown_jitter_rejected() {
        assert!(
            Cli::try_parse_from(["jenga", "--jitter", "wild", "estimate", "status", "x"]).is_err()
        );
    }
}

//! Estimate command handlers
//!
//! Submits estimate jobs and follows them until the server reports a
//! result, the wait budget runs out, or the user interrupts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use jenga_client::EstimatesClient;
use jenga_core::domain::job::JobHandle;
use jenga_core::domain::outcome::PollOutcome;
use jenga_poller::{Classification, JobPoller, PollerRegistry, Progress, classify};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::config::Config;

/// Estimate subcommands
#[derive(Subcommand)]
pub enum EstimateCommands {
    /// Submit an estimate request for background generation
    Submit {
        /// JSON file holding the request payload ("-" reads stdin)
        payload: PathBuf,

        /// Wait for the job to finish
        #[arg(short, long)]
        wait: bool,
    },
    /// Show the current status of a job
    Status {
        /// Task id returned at submission
        task_id: String,
    },
    /// Poll a job until it finishes
    Watch {
        /// Task id returned at submission
        task_id: String,
    },
}

/// Handle estimate commands
pub async fn handle_estimate_command(command: EstimateCommands, config: &Config) -> Result<()> {
    let client = EstimatesClient::new(&config.api_url);

    match command {
        EstimateCommands::Submit { payload, wait } => {
            submit_estimate(&client, config, &payload, wait).await
        }
        EstimateCommands::Status { task_id } => show_status(&client, &task_id).await,
        EstimateCommands::Watch { task_id } => {
            let handle = JobHandle::new(task_id)?;
            watch_job(&client, config, handle).await
        }
    }
}

/// Submit a payload, optionally waiting for the result
async fn submit_estimate(
    client: &EstimatesClient,
    config: &Config,
    path: &Path,
    wait: bool,
) -> Result<()> {
    let payload = read_payload(path).await?;

    let handle = client
        .submit_estimate(&payload)
        .await
        .context("Failed to submit estimate request")?;

    info!("Submitted estimate job {}", handle);
    println!(
        "{} Estimate queued as job {}",
        "✓".green(),
        handle.id().cyan()
    );

    if wait {
        watch_job(client, config, handle).await
    } else {
        println!(
            "{}",
            format!("  Follow it with: jenga estimate watch {}", handle).dimmed()
        );
        Ok(())
    }
}

/// Query a job once and show how it reads
async fn show_status(client: &EstimatesClient, task_id: &str) -> Result<()> {
    let handle = JobHandle::new(task_id)?;
    let raw = client
        .task_status(&handle)
        .await
        .context("Failed to query job status")?;

    println!("{}", format!("Status of job {}:", handle).bold());
    println!("{}", serde_json::to_string_pretty(&raw)?);
    println!();

    match classify(&raw) {
        Classification::Succeeded { .. } => println!("  State: {}", "finished".green()),
        Classification::Failed { reason } => {
            println!("  State: {}", "failed".red());
            println!("  Error: {}", reason.red());
        }
        Classification::NotTerminalYet => println!("  State: {}", "in progress".yellow()),
    }

    Ok(())
}

/// Poll a job until it resolves; Ctrl-C stops watching
async fn watch_job(client: &EstimatesClient, config: &Config, handle: JobHandle) -> Result<()> {
    let poller = JobPoller::new(PollerRegistry::new()).with_progress(print_progress);

    let query_client = client.clone();
    let session = poller.start(
        handle.clone(),
        config.policy.clone(),
        move |handle: JobHandle| {
            let client = query_client.clone();
            async move { Ok::<_, anyhow::Error>(client.task_status(&handle).await?) }
        },
    )?;

    println!(
        "{}",
        format!("Generating estimate for job {}...", handle).bold()
    );

    let canceller = session.canceller();
    let outcome = session.outcome();
    tokio::pin!(outcome);

    let outcome = tokio::select! {
        outcome = &mut outcome => outcome?,
        _ = tokio::signal::ctrl_c() => {
            canceller.cancel();
            outcome.await?
        }
    };

    print_outcome(&handle, &outcome, config);

    match outcome {
        PollOutcome::Succeeded { .. } => Ok(()),
        PollOutcome::Failed { reason } => anyhow::bail!("Job {} failed: {}", handle, reason),
        PollOutcome::TimedOut => anyhow::bail!("Gave up waiting for job {}", handle),
        PollOutcome::Cancelled => anyhow::bail!("Stopped watching job {}", handle),
    }
}

/// Read a JSON payload from a file, or stdin for "-"
async fn read_payload(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read payload file {}", path.display()))?
    };

    serde_json::from_str(&text).context("Payload is not valid JSON")
}

fn print_progress(progress: Progress) {
    eprintln!(
        "{}",
        format!(
            "  … still generating (attempt {}, {}s elapsed)",
            progress.attempts,
            progress.elapsed.as_secs()
        )
        .dimmed()
    );
}

/// Print a terminal outcome
///
/// Failure and timeout read differently on purpose: a failed job should be
/// resubmitted, a timed-out one may still complete.
fn print_outcome(handle: &JobHandle, outcome: &PollOutcome, config: &Config) {
    match outcome {
        PollOutcome::Succeeded { result } => {
            println!("{} Estimate generated successfully", "✓".green());
            if let Some(id) = result.get("estimate_id") {
                println!("  Estimate ID: {}", id.to_string().cyan());
            }
            if !result.is_null() {
                println!("\n{}", "Result:".bold());
                match serde_json::to_string_pretty(result) {
                    Ok(pretty) => println!("{}", pretty),
                    Err(_) => println!("{:?}", result),
                }
            }
        }
        PollOutcome::Failed { reason } => {
            println!("{} Estimate generation failed", "✗".red());
            println!("  {}", reason.red());
            println!("{}", "  Please try again.".dimmed());
        }
        PollOutcome::TimedOut => {
            println!(
                "{} Still generating after {:?}",
                "⚠".yellow(),
                config.policy.max_elapsed()
            );
            println!(
                "{}",
                format!(
                    "  The job may still complete. Check back later with: jenga estimate watch {}",
                    handle
                )
                .dimmed()
            );
        }
        PollOutcome::Cancelled => {
            println!("{} Stopped watching job {}", "⚠".yellow(), handle);
            println!(
                "{}",
                "  The job may still complete in the background.".dimmed()
            );
        }
    }
}

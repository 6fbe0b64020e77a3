//! Jenga Poller
//!
//! Tracks background estimate jobs until they reach a terminal state.
//!
//! Architecture:
//! - Classifier: maps loosely-shaped status bodies onto semantic outcomes
//! - Policy: poll cadence and the wall-clock budget
//! - Registry: at most one live poll loop per job id
//! - Poller: drives one loop per job and resolves it exactly once
//!
//! ```no_run
//! use jenga_core::domain::job::JobHandle;
//! use jenga_poller::{JobPoller, PollerRegistry, PollingPolicy};
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let poller = JobPoller::new(PollerRegistry::new());
//! let handle = JobHandle::new("c0ffee")?;
//!
//! let session = poller.start(handle, PollingPolicy::default(), |_handle: JobHandle| async {
//!     Ok::<_, anyhow::Error>(json!({ "status": "SUCCESS", "result": { "estimate_id": 7 } }))
//! })?;
//!
//! println!("{:?}", session.outcome().await?);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod error;
pub mod policy;
pub mod poller;
pub mod query;
pub mod registry;

pub use classifier::{Classification, classify};
pub use error::{PolicyError, PollError};
pub use jenga_core::domain::outcome::PollOutcome;
pub use policy::{JitterPolicy, PollingPolicy, PollingPolicyBuilder};
pub use poller::{JobPoller, PollCanceller, PollReport, PollSession, Progress};
pub use query::StatusQuery;
pub use registry::PollerRegistry;

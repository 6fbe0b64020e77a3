//! Job handle domain type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a job handle cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobHandleError {
    #[error("job id cannot be empty")]
    Empty,
}

/// Opaque identifier of a background job accepted by the server
///
/// The id is whatever token the submission call returned; it is never
/// interpreted, only echoed back on status queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobHandle {
    id: String,
}

impl JobHandle {
    /// Creates a handle from the token returned by the server
    pub fn new(id: impl Into<String>) -> Result<Self, JobHandleError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(JobHandleError::Empty);
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<String> for JobHandle {
    type Error = JobHandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobHandle> for String {
    fn from(handle: JobHandle) -> Self {
        handle.id
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

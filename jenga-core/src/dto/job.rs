//! Job submission DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobHandle, JobHandleError};

/// Body returned by the server when it accepts a background job (202)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAccepted {
    pub task_id: Option<String>,
    /// Free-form acknowledgement message, e.g. "Task created successfully"
    #[serde(default)]
    pub status: Option<String>,
}

impl JobAccepted {
    /// Extracts the handle, failing when the server omitted or blanked the id
    pub fn into_handle(self) -> Result<JobHandle, JobHandleError> {
        JobHandle::new(self.task_id.unwrap_or_default())
    }
}

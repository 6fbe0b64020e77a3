//! Estimate job endpoints

use jenga_core::domain::job::JobHandle;
use jenga_core::dto::job::JobAccepted;
use serde_json::Value;
use tracing::debug;

use crate::EstimatesClient;
use crate::error::{ClientError, Result};

impl EstimatesClient {
    // =============================================================================
    // Background Estimate Jobs
    // =============================================================================

    /// Submit an estimate request for background generation
    ///
    /// The payload is sent as-is. The call is never retried: any failure,
    /// including a 202 without a task id, is returned to the caller.
    ///
    /// # Returns
    /// The handle of the queued job
    pub async fn submit_estimate(&self, payload: &Value) -> Result<JobHandle> {
        let url = self.endpoint(&["api", "estimates", "create-with-gemini-async"])?;
        let response = self.client.post(url).json(payload).send().await?;

        let accepted: JobAccepted = self.handle_response(response).await?;
        debug!("Submission acknowledged: {:?}", accepted.status);

        accepted
            .into_handle()
            .map_err(|_| ClientError::MissingTaskId)
    }

    /// Query the status of a background job
    ///
    /// # Returns
    /// The raw status body; its shape depends on the job type
    pub async fn task_status(&self, handle: &JobHandle) -> Result<Value> {
        let url = self.endpoint(&["api", "estimates", "tasks", handle.id()])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_submit_returns_handle() {
        let router = Router::new().route(
            "/api/estimates/create-with-gemini-async/",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["project_name"], "Duplex");
                (
                    StatusCode::ACCEPTED,
                    Json(json!({"task_id": "task-42", "status": "Task created successfully"})),
                )
            }),
        );
        let client = EstimatesClient::new(spawn_stub(router).await);

        let handle = client
            .submit_estimate(&json!({"project_name": "Duplex"}))
            .await
            .unwrap();
        assert_eq!(handle.id(), "task-42");
    }

    #[tokio::test]
    async fn test_submit_without_task_id_fails() {
        let router = Router::new().route(
            "/api/estimates/create-with-gemini-async/",
            post(|| async { (StatusCode::ACCEPTED, Json(json!({"status": "queued"}))) }),
        );
        let client = EstimatesClient::new(spawn_stub(router).await);

        let err = client.submit_estimate(&json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingTaskId));
    }

    #[tokio::test]
    async fn test_submit_surfaces_server_error() {
        let router = Router::new().route(
            "/api/estimates/create-with-gemini-async/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "broker down") }),
        );
        let client = EstimatesClient::new(spawn_stub(router).await);

        let err = client.submit_estimate(&json!({})).await.unwrap_err();
        assert!(err.is_server_error());
        assert!(err.to_string().contains("broker down"));
    }

    #[tokio::test]
    async fn test_task_status_returns_raw_body() {
        let router = Router::new().route(
            "/api/estimates/tasks/{task_id}/",
            get(|Path(task_id): Path<String>| async move {
                Json(json!({"status": "pending", "progress": 0, "id": task_id}))
            }),
        );
        let client = EstimatesClient::new(spawn_stub(router).await);
        let handle = JobHandle::new("task-7").unwrap();

        let status = client.task_status(&handle).await.unwrap();
        assert_eq!(status["status"], "pending");
        assert_eq!(status["id"], "task-7");
    }

    #[tokio::test]
    async fn test_task_status_rejects_non_json() {
        let router = Router::new().route(
            "/api/estimates/tasks/{task_id}/",
            get(|| async { "<html>maintenance</html>" }),
        );
        let client = EstimatesClient::new(spawn_stub(router).await);
        let handle = JobHandle::new("task-7").unwrap();

        let err = client.task_status(&handle).await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }
}

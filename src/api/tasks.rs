use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::model::{StatusUpdate, Task, TaskFilters, TaskPatch};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody<'a> {
    task_ids: &'a [Uuid],
}

/// Reject updates the server would refuse anyway.
pub fn validate_status_update(update: &StatusUpdate) -> Result<(), ApiError> {
    match update.progress {
        Some(p) if p > 100 => Err(ApiError::Validation(format!(
            "progress must be between 0 and 100, got {}",
            p
        ))),
        _ => Ok(()),
    }
}

impl ApiClient {
    /// `PATCH /tasks/:id/status`
    pub async fn update_task_status(&self, task_id: Uuid, update: StatusUpdate) -> Result<Task, ApiError> {
        validate_status_update(&update)?;
        let path = format!("tasks/{}/status", task_id);
        let rb = self.request(Method::PATCH, &path).json(&update);
        self.send_json(rb, "PATCH", &path).await
    }

    /// `PUT /tasks/reorder`
    pub async fn reorder_tasks(&self, ordered_ids: &[Uuid]) -> Result<(), ApiError> {
        let path = "tasks/reorder";
        let rb = self
            .request(Method::PUT, path)
            .json(&ReorderBody { task_ids: ordered_ids });
        self.send_ack(rb, "PUT", path).await
    }

    /// `GET /projects/:id/tasks`
    pub async fn get_tasks(&self, project_id: Uuid, filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
        let path = format!("projects/{}/tasks", project_id);
        let rb = self.request(Method::GET, &path).query(&filters.query_pairs());
        self.send_json(rb, "GET", &path).await
    }

    /// `GET /tasks/:id`
    pub async fn get_task(&self, task_id: Uuid) -> Result<Task, ApiError> {
        let path = format!("tasks/{}", task_id);
        let rb = self.request(Method::GET, &path);
        self.send_json(rb, "GET", &path).await
    }

    /// `PATCH /tasks/:id`
    pub async fn update_task(&self, task_id: Uuid, patch: &TaskPatch) -> Result<Task, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::Validation("nothing to update".into()));
        }
        if let (Some(start), Some(due)) = (patch.start_date, patch.due_date) {
            if start > due {
                return Err(ApiError::Validation("start date is after the due date".into()));
            }
        }
        let path = format!("tasks/{}", task_id);
        let rb = self.request(Method::PATCH, &path).json(patch);
        self.send_json(rb, "PATCH", &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Session, Settings};
    use crate::model::TaskStatus;

    #[test]
    fn progress_above_100_is_rejected() {
        let bad = StatusUpdate {
            status: TaskStatus::Done,
            progress: Some(101),
        };
        assert!(matches!(validate_status_update(&bad), Err(ApiError::Validation(_))));
        assert!(validate_status_update(&StatusUpdate::for_column(TaskStatus::Done)).is_ok());
    }

    #[tokio::test]
    async fn invalid_updates_fail_before_any_request() {
        // Nothing listens on this port; a request would surface as Transport.
        let settings = Settings {
            api_base_url: "http://127.0.0.1:9".into(),
            ..Settings::default()
        };
        let client = ApiClient::new(&settings, Session::default()).unwrap();
        let err = client
            .update_task_status(
                Uuid::new_v4(),
                StatusUpdate {
                    status: TaskStatus::Done,
                    progress: Some(150),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = client
            .update_task(Uuid::new_v4(), &TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn reorder_body_uses_task_ids_key() {
        let ids = [Uuid::nil()];
        let body = serde_json::to_value(ReorderBody { task_ids: &ids }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"taskIds": ["00000000-0000-0000-0000-000000000000"]})
        );
    }
}

//! Remote service facade over the TaskFlow REST API.

mod client;
mod comments;
mod daily_updates;
pub mod envelope;
mod notifications;
mod projects;
mod tags;
mod tasks;

use async_trait::async_trait;
use uuid::Uuid;

pub use client::ApiClient;

use crate::error::ApiError;
use crate::model::{Project, StatusUpdate, Task, TaskFilters};

/// The calls the board, timeline and Gantt views depend on.
///
/// Nothing here retries: a failure propagates once to the caller.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn update_task_status(&self, task_id: Uuid, update: StatusUpdate) -> Result<Task, ApiError>;

    /// Best-effort; callers may ignore the result.
    async fn reorder_tasks(&self, ordered_ids: &[Uuid]) -> Result<(), ApiError>;

    async fn get_projects_timeline(&self) -> Result<Vec<Project>, ApiError>;

    async fn get_tasks(&self, project_id: Uuid, filters: &TaskFilters) -> Result<Vec<Task>, ApiError>;
}

#[async_trait]
impl TaskService for ApiClient {
    async fn update_task_status(&self, task_id: Uuid, update: StatusUpdate) -> Result<Task, ApiError> {
        ApiClient::update_task_status(self, task_id, update).await
    }

    async fn reorder_tasks(&self, ordered_ids: &[Uuid]) -> Result<(), ApiError> {
        ApiClient::reorder_tasks(self, ordered_ids).await
    }

    async fn get_projects_timeline(&self) -> Result<Vec<Project>, ApiError> {
        ApiClient::get_projects_timeline(self).await
    }

    async fn get_tasks(&self, project_id: Uuid, filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
        ApiClient::get_tasks(self, project_id, filters).await
    }
}

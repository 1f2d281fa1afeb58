use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::TaskStatus;

/// A progress report posted against a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUpdate {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub progress: u8,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /tasks/:id/daily-updates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyUpdate {
    pub progress: u8,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

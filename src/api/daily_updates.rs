use reqwest::Method;
use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::model::{DailyUpdate, NewDailyUpdate};

impl ApiClient {
    /// `GET /tasks/:id/daily-updates`
    pub async fn list_daily_updates(&self, task_id: Uuid) -> Result<Vec<DailyUpdate>, ApiError> {
        let path = format!("tasks/{}/daily-updates", task_id);
        let rb = self.request(Method::GET, &path);
        self.send_json(rb, "GET", &path).await
    }

    /// `POST /tasks/:id/daily-updates`
    pub async fn submit_daily_update(
        &self,
        task_id: Uuid,
        update: &NewDailyUpdate,
    ) -> Result<DailyUpdate, ApiError> {
        if update.progress > 100 {
            return Err(ApiError::Validation("progress must be between 0 and 100".into()));
        }
        let path = format!("tasks/{}/daily-updates", task_id);
        let rb = self.request(Method::POST, &path).json(update);
        self.send_json(rb, "POST", &path).await
    }
}

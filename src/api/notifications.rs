use reqwest::Method;
use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::model::notification::UnreadCount;
use crate::model::Notification;

impl ApiClient {
    /// `GET /notifications`
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let path = "notifications";
        let rb = self.request(Method::GET, path);
        self.send_json(rb, "GET", path).await
    }

    /// `GET /notifications/unread-count`
    pub async fn unread_notification_count(&self) -> Result<u32, ApiError> {
        let path = "notifications/unread-count";
        let rb = self.request(Method::GET, path);
        let count: UnreadCount = self.send_json(rb, "GET", path).await?;
        Ok(count.count)
    }

    /// `PATCH /notifications/:id/read`
    pub async fn mark_notification_read(&self, notification_id: Uuid) -> Result<(), ApiError> {
        let path = format!("notifications/{}/read", notification_id);
        let rb = self.request(Method::PATCH, &path);
        self.send_ack(rb, "PATCH", &path).await
    }
}

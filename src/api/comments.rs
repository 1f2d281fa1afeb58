use reqwest::Method;
use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::model::{Comment, NewComment};

impl ApiClient {
    /// `GET /tasks/:id/comments`
    pub async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        let path = format!("tasks/{}/comments", task_id);
        let rb = self.request(Method::GET, &path);
        self.send_json(rb, "GET", &path).await
    }

    /// `POST /tasks/:id/comments`
    pub async fn add_comment(&self, task_id: Uuid, comment: &NewComment) -> Result<Comment, ApiError> {
        if comment.content.trim().is_empty() {
            return Err(ApiError::Validation("comment is empty".into()));
        }
        let path = format!("tasks/{}/comments", task_id);
        let rb = self.request(Method::POST, &path).json(comment);
        self.send_json(rb, "POST", &path).await
    }
}

use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::model::Tag;

impl ApiClient {
    /// `GET /tags`
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let path = "tags";
        let rb = self.request(Method::GET, path);
        self.send_json(rb, "GET", path).await
    }
}

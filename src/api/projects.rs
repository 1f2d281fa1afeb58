use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::model::Project;

impl ApiClient {
    /// `GET /projects`
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let path = "projects";
        let rb = self.request(Method::GET, path);
        self.send_json(rb, "GET", path).await
    }

    /// `GET /projects/timeline`
    pub async fn get_projects_timeline(&self) -> Result<Vec<Project>, ApiError> {
        let path = "projects/timeline";
        let rb = self.request(Method::GET, path);
        self.send_json(rb, "GET", path).await
    }
}

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::envelope;
use crate::config::{Session, Settings};
use crate::error::ApiError;

/// HTTP client for the TaskFlow REST API.
///
/// The session is handed in explicitly; the client never reads tokens from
/// anywhere else.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(settings: &Settings, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url().to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let rb = self.http.request(method, self.url(path));
        match self.session.access_token.as_deref() {
            Some(token) if !token.is_empty() => rb.bearer_auth(token),
            _ => rb,
        }
    }

    /// Send and decode an envelope carrying `data`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        rb: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<T, ApiError> {
        let (status, body) = self.send(rb, method, path).await?;
        envelope::decode_data(status, &body)
    }

    /// Send and only check the envelope's `success` flag.
    pub(crate) async fn send_ack(
        &self,
        rb: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<(), ApiError> {
        let (status, body) = self.send(rb, method, path).await?;
        envelope::decode_ack(status, &body)
    }

    async fn send(
        &self,
        rb: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<(u16, String), ApiError> {
        tracing::debug!(method, path, "api request");
        let resp = rb.send().await.map_err(|e| {
            tracing::warn!(method, path, error = %e, "api request failed to send");
            e
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        if !(200..300).contains(&status) {
            tracing::warn!(method, path, status, "api request returned an error status");
        }
        Ok((status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let settings = Settings {
            api_base_url: "http://localhost:3000/api/".into(),
            ..Settings::default()
        };
        let client = ApiClient::new(&settings, Session::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/tasks/reorder"), "http://localhost:3000/api/tasks/reorder");
        assert_eq!(client.url("projects"), "http://localhost:3000/api/projects");
    }

    #[test]
    fn bearer_header_comes_from_the_session() {
        let session = Session {
            access_token: Some("tok-123".into()),
            refresh_token: None,
        };
        let client = ApiClient::new(&Settings::default(), session).unwrap();
        let request = client.request(Method::GET, "projects").build().unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok-123"
        );

        let anonymous = ApiClient::new(&Settings::default(), Session::default()).unwrap();
        let request = anonymous.request(Method::GET, "projects").build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}

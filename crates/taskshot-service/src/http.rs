use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, StatusCode};
use taskshot_core::screenshot::{ScreenshotList, TASKS_API_PREFIX};

use crate::{ScreenshotService, ServiceError};

/// Characters that must be escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn segment(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

fn screenshots_path(task_id: &str) -> String {
    format!("{TASKS_API_PREFIX}/{}/screenshots", segment(task_id))
}

fn screenshot_path(task_id: &str, filename: &str) -> String {
    format!("{}/{}", screenshots_path(task_id), segment(filename))
}

/// Async HTTP client implementation of ScreenshotService.
/// Connects to a running taskshot-server.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL a browser can use to fetch one screenshot. Both the task
    /// id and the filename are percent-encoded as path segments.
    pub fn screenshot_url(&self, task_id: &str, filename: &str) -> String {
        format!("{}{}", self.base_url, screenshot_path(task_id, filename))
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(parse_error_with_status(status, resp).await)
        }
    }
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::FORBIDDEN => ServiceError::Forbidden(msg),
        StatusCode::BAD_REQUEST => ServiceError::InvalidInput(msg),
        _ => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl ScreenshotService for HttpService {
    async fn list_screenshots(&self, task_id: &str) -> Result<ScreenshotList, ServiceError> {
        self.get(&screenshots_path(task_id))
            .await?
            .json::<ScreenshotList>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    }

    async fn download_screenshot(
        &self,
        task_id: &str,
        filename: &str,
    ) -> Result<Bytes, ServiceError> {
        self.get(&screenshot_path(task_id, filename))
            .await?
            .bytes()
            .await
            .map_err(|e| ServiceError::Internal(format!("read body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let svc = HttpService::new("http://localhost:8000/");
        assert_eq!(svc.base_url(), "http://localhost:8000");
    }

    #[test]
    fn screenshot_url_is_absolute() {
        let svc = HttpService::new("http://localhost:8000");
        assert_eq!(
            svc.screenshot_url("T1", "b.png"),
            "http://localhost:8000/api/v1/tasks/T1/screenshots/b.png"
        );
    }

    #[test]
    fn screenshot_url_encodes_segments() {
        let svc = HttpService::new("http://localhost:8000");
        assert_eq!(
            svc.screenshot_url("T 1", "shot#1.png"),
            "http://localhost:8000/api/v1/tasks/T%201/screenshots/shot%231.png"
        );
        assert_eq!(
            svc.screenshot_url("T1", "a%20b.png"),
            "http://localhost:8000/api/v1/tasks/T1/screenshots/a%2520b.png"
        );
        assert_eq!(
            svc.screenshot_url("T1", "../x.png"),
            "http://localhost:8000/api/v1/tasks/T1/screenshots/..%2Fx.png"
        );
    }
}

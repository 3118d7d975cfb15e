use async_trait::async_trait;
use bytes::Bytes;
use taskshot_core::screenshot::ScreenshotList;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Read access to the screenshots filed under a task.
///
/// `LocalService` answers from the task registry and the local screenshot
/// directory. `HttpService` talks to a running taskshot-server.
#[async_trait]
pub trait ScreenshotService: Send + Sync {
    /// All PNG screenshots of a task, newest first.
    async fn list_screenshots(&self, task_id: &str) -> Result<ScreenshotList, ServiceError>;

    /// The full contents of one screenshot.
    async fn download_screenshot(
        &self,
        task_id: &str,
        filename: &str,
    ) -> Result<Bytes, ServiceError>;
}

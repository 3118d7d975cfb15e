use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use taskshot_core::screenshot::ScreenshotList;
use taskshot_core::task::Task;
use taskshot_db::{Database, DbError};
use taskshot_store::{ScreenshotFile, ScreenshotStore, StoreError};
use tokio::io::AsyncReadExt;

use crate::{ScreenshotService, ServiceError};

pub const TASK_NOT_FOUND: &str = "Task not found";
pub const SCREENSHOT_NOT_FOUND: &str = "Screenshot not found";
pub const ACCESS_DENIED: &str = "Access denied";
pub const INVALID_FILE_PATH: &str = "Invalid file path";
pub const ONLY_PNG_SUPPORTED: &str = "Only PNG files are supported";

/// Local implementation: task registry lookup followed by filesystem access.
pub struct LocalService {
    db: Arc<dyn Database>,
    store: Arc<ScreenshotStore>,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>, store: Arc<ScreenshotStore>) -> Self {
        Self { db, store }
    }

    async fn require_task(&self, task_id: &str) -> Result<Task, ServiceError> {
        match self.db.get_task(task_id).await {
            Ok(task) => Ok(task),
            Err(DbError::NotFound(_)) => Err(ServiceError::NotFound(TASK_NOT_FOUND.into())),
            Err(e) => Err(ServiceError::Internal(e.to_string())),
        }
    }

    /// Open a screenshot for streaming after the task and path checks pass.
    pub async fn open_screenshot(
        &self,
        task_id: &str,
        filename: &str,
    ) -> Result<ScreenshotFile, ServiceError> {
        self.require_task(task_id).await?;
        self.store.open(task_id, filename).await.map_err(|e| {
            match &e {
                StoreError::AccessDenied(detail) | StoreError::InvalidPath(detail) => {
                    tracing::warn!("task {task_id}: rejected screenshot path: {detail}");
                }
                StoreError::Internal(detail) => {
                    tracing::error!("task {task_id}: {detail}");
                }
                _ => {}
            }
            e.into()
        })
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ServiceError::NotFound(SCREENSHOT_NOT_FOUND.into()),
            StoreError::AccessDenied(_) => ServiceError::Forbidden(ACCESS_DENIED.into()),
            StoreError::InvalidPath(_) => ServiceError::Forbidden(INVALID_FILE_PATH.into()),
            StoreError::UnsupportedType(_) => {
                ServiceError::InvalidInput(ONLY_PNG_SUPPORTED.into())
            }
            StoreError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}

#[async_trait]
impl ScreenshotService for LocalService {
    async fn list_screenshots(&self, task_id: &str) -> Result<ScreenshotList, ServiceError> {
        self.require_task(task_id).await?;
        Ok(self.store.list(task_id).await?)
    }

    async fn download_screenshot(
        &self,
        task_id: &str,
        filename: &str,
    ) -> Result<Bytes, ServiceError> {
        let mut shot = self.open_screenshot(task_id, filename).await?;
        let mut buf = Vec::with_capacity(shot.size_bytes as usize);
        shot.file
            .read_to_end(&mut buf)
            .await
            .map_err(|e| ServiceError::Internal(format!("read {}: {e}", shot.path.display())))?;
        Ok(Bytes::from(buf))
    }
}

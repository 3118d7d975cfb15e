pub mod sqlite;

pub use sqlite::SqliteDatabase;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use taskshot_core::task::{CreateTask, Task};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Internal(String),
}

/// Task registry consulted before any screenshot is listed or served.
///
/// The screenshot endpoints only ever call [`Database::get_task`]; the write
/// methods exist so the registry can be administered from the CLI.
#[async_trait]
pub trait Database: Send + Sync {
    async fn get_task(&self, id: &str) -> Result<Task, DbError>;
    async fn create_task(&self, input: &CreateTask) -> Result<Task, DbError>;
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError>;
    async fn delete_task(&self, id: &str) -> Result<(), DbError>;
}

/// Database location. `None` falls back to `<data_dir>/taskshot.db`.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    pub sqlite_path: Option<PathBuf>,
}

/// Open the configured database behind the trait object the service layer uses.
pub fn open_database(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    Ok(Arc::new(SqliteDatabase::open(config)?))
}

/// `$XDG_DATA_HOME/taskshot`, else `~/.local/share/taskshot`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("taskshot")
}

mod local;
mod resolve;

pub use local::{ScreenshotFile, ScreenshotStore};
pub use resolve::{is_within, resolve_lenient};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested path resolved outside the task's screenshot directory.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The requested path could not be resolved at all.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// Configuration for the screenshot directory tree.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Base directory holding one sub-directory per task id.
    /// `None` falls back to [`default_screenshot_dir`].
    pub screenshot_dir: Option<PathBuf>,
}

/// `$XDG_DATA_HOME/taskshot/screenshots`, else `~/.local/share/taskshot/screenshots`.
pub fn default_screenshot_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("taskshot").join("screenshots")
}

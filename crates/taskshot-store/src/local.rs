use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use taskshot_core::screenshot::{download_url, EmptyReason, Screenshot, ScreenshotList};

use crate::resolve::{is_within, resolve_lenient};
use crate::{default_screenshot_dir, StoreConfig, StoreError};

const PNG_SUFFIX: &str = ".png";

/// Read-only view of `<base_dir>/<task_id>/*.png`.
pub struct ScreenshotStore {
    base_dir: PathBuf,
}

/// An opened screenshot, ready to be streamed.
#[derive(Debug)]
pub struct ScreenshotFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub file: tokio::fs::File,
}

impl ScreenshotStore {
    pub fn new(config: &StoreConfig) -> Self {
        let base_dir = config
            .screenshot_dir
            .clone()
            .unwrap_or_else(default_screenshot_dir);
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn task_dir(&self, task_id: &str) -> PathBuf {
        self.base_dir.join(task_id)
    }

    /// List the PNG files directly inside the task's directory, newest first.
    pub async fn list(&self, task_id: &str) -> Result<ScreenshotList, StoreError> {
        let dir = self.task_dir(task_id);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(ScreenshotList::empty(task_id, EmptyReason::NoDirectory)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ScreenshotList::empty(task_id, EmptyReason::NoDirectory))
            }
            Err(e) => {
                return Err(StoreError::Internal(format!(
                    "stat {}: {e}",
                    dir.display()
                )))
            }
        }

        let dir = tokio::fs::canonicalize(&dir)
            .await
            .map_err(|e| StoreError::Internal(format!("canonicalize {}: {e}", dir.display())))?;
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| StoreError::Internal(format!("list {}: {e}", dir.display())))?;

        let mut found: Vec<(DateTime<Utc>, Screenshot)> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Internal(format!("read_dir entry: {e}")))?
        {
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            if filename.starts_with('.') || !filename.ends_with(PNG_SUFFIX) {
                continue;
            }

            let path = dir.join(&filename);
            // Follows symlinks; a dangling link or a file removed mid-listing is skipped.
            let meta = match tokio::fs::metadata(&path).await {
                Ok(meta) => meta,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(StoreError::Internal(format!(
                        "stat {}: {e}",
                        path.display()
                    )))
                }
            };
            if !meta.is_file() {
                continue;
            }
            let modified: DateTime<Utc> = meta
                .modified()
                .map_err(|e| StoreError::Internal(format!("mtime {}: {e}", path.display())))?
                .into();

            found.push((
                modified,
                Screenshot {
                    download_url: download_url(task_id, &filename),
                    path: path.to_string_lossy().into_owned(),
                    size_bytes: meta.len(),
                    modified_at: modified,
                    filename,
                },
            ));
        }

        found.sort_by(|(a_time, a), (b_time, b)| {
            (Reverse(a_time), &a.filename).cmp(&(Reverse(b_time), &b.filename))
        });
        tracing::debug!("task {task_id}: {} screenshot(s) in {}", found.len(), dir.display());

        Ok(ScreenshotList::new(
            task_id,
            found.into_iter().map(|(_, shot)| shot).collect(),
        ))
    }

    /// Resolve `filename` inside the task's directory, refusing anything
    /// that lands outside it. Runs on the blocking pool since resolution
    /// canonicalizes each existing path prefix.
    pub async fn resolve(&self, task_id: &str, filename: &str) -> Result<PathBuf, StoreError> {
        let task_dir = self.task_dir(task_id);
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || resolve_within(&task_dir, &filename))
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    /// Open one screenshot of a task for reading.
    ///
    /// Checks run in order: containment, existence, then the `.png`
    /// extension (case-insensitive).
    pub async fn open(&self, task_id: &str, filename: &str) -> Result<ScreenshotFile, StoreError> {
        let path = self.resolve(task_id, filename).await?;

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                return Err(StoreError::NotFound(format!("{task_id}/{filename}")))
            }
            Err(e) => {
                return Err(StoreError::Internal(format!(
                    "stat {}: {e}",
                    path.display()
                )))
            }
        };

        if !has_png_extension(&path) {
            return Err(StoreError::UnsupportedType(filename.to_string()));
        }
        if !meta.is_file() {
            return Err(StoreError::NotFound(format!("{task_id}/{filename}")));
        }

        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| StoreError::Internal(format!("open {}: {e}", path.display())))?;
        Ok(ScreenshotFile {
            path,
            size_bytes: meta.len(),
            file,
        })
    }
}

fn resolve_within(task_dir: &Path, filename: &str) -> Result<PathBuf, StoreError> {
    let root = resolve_lenient(task_dir)
        .map_err(|e| StoreError::InvalidPath(format!("{}: {e}", task_dir.display())))?;
    let candidate = resolve_lenient(&task_dir.join(filename))
        .map_err(|e| StoreError::InvalidPath(format!("{filename:?}: {e}")))?;

    if !is_within(&candidate, &root) {
        return Err(StoreError::AccessDenied(format!(
            "{filename:?} resolves outside {}",
            root.display()
        )));
    }
    Ok(candidate)
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

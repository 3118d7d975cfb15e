use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Route prefix under which task resources, and their screenshots, are served.
pub const TASKS_API_PREFIX: &str = "/api/v1/tasks";

/// Server-relative URL for downloading one screenshot of a task.
pub fn download_url(task_id: &str, filename: &str) -> String {
    format!("{TASKS_API_PREFIX}/{task_id}/screenshots/{filename}")
}

/// Metadata for one PNG file in a task's screenshot directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub filename: String,
    /// Resolved absolute path on the serving host.
    pub path: String,
    pub size_bytes: u64,
    /// Last-modified time of the file, not its creation time.
    #[serde(alias = "created_at")]
    pub modified_at: DateTime<Utc>,
    pub download_url: String,
}

/// Why a screenshot listing came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The task has no screenshot directory yet.
    NoDirectory,
    /// The directory exists but holds no `.png` files.
    NoPngFiles,
}

impl EmptyReason {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::NoDirectory => "No screenshots found for this task",
            EmptyReason::NoPngFiles => "No PNG files found for this task",
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotList {
    pub task_id: String,
    pub screenshots: Vec<Screenshot>,
    pub total_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<EmptyReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScreenshotList {
    /// A listing with entries. Falls back to [`ScreenshotList::empty`] with
    /// [`EmptyReason::NoPngFiles`] when `screenshots` is empty.
    pub fn new(task_id: impl Into<String>, screenshots: Vec<Screenshot>) -> Self {
        if screenshots.is_empty() {
            return Self::empty(task_id, EmptyReason::NoPngFiles);
        }
        Self {
            task_id: task_id.into(),
            total_count: screenshots.len(),
            screenshots,
            reason: None,
            message: None,
        }
    }

    pub fn empty(task_id: impl Into<String>, reason: EmptyReason) -> Self {
        Self {
            task_id: task_id.into(),
            screenshots: Vec::new(),
            total_count: 0,
            reason: Some(reason),
            message: Some(reason.message().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.screenshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(filename: &str) -> Screenshot {
        Screenshot {
            filename: filename.into(),
            path: format!("/data/screenshots/t1/{filename}"),
            size_bytes: 42,
            modified_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            download_url: download_url("t1", filename),
        }
    }

    #[test]
    fn download_url_points_at_download_route() {
        assert_eq!(
            download_url("abc-123", "step_1.png"),
            "/api/v1/tasks/abc-123/screenshots/step_1.png"
        );
    }

    #[test]
    fn empty_list_carries_reason_and_message() {
        let list = ScreenshotList::empty("t1", EmptyReason::NoDirectory);
        let v = serde_json::to_value(&list).unwrap();
        assert_eq!(v["task_id"], "t1");
        assert_eq!(v["total_count"], 0);
        assert_eq!(v["reason"], "no_directory");
        assert_eq!(v["message"], "No screenshots found for this task");
        assert!(v["screenshots"].as_array().unwrap().is_empty());
    }

    #[test]
    fn new_with_no_entries_means_no_png_files() {
        let list = ScreenshotList::new("t1", vec![]);
        assert_eq!(list.reason, Some(EmptyReason::NoPngFiles));
        assert_eq!(list.message.as_deref(), Some("No PNG files found for this task"));
    }

    #[test]
    fn populated_list_omits_reason() {
        let list = ScreenshotList::new("t1", vec![sample("a.png"), sample("b.png")]);
        assert_eq!(list.total_count, 2);
        let v = serde_json::to_value(&list).unwrap();
        assert!(v.get("reason").is_none());
        assert!(v.get("message").is_none());
        assert_eq!(v["screenshots"][0]["modified_at"], "2025-03-01T12:00:00Z");
    }

    #[test]
    fn accepts_legacy_created_at_field() {
        let json = r#"{
            "filename": "a.png",
            "path": "/srv/shots/t1/a.png",
            "size_bytes": 10,
            "created_at": "2025-03-01T12:00:00Z",
            "download_url": "/api/v1/tasks/t1/screenshots/a.png"
        }"#;
        let shot: Screenshot = serde_json::from_str(json).unwrap();
        assert_eq!(shot.modified_at, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }
}

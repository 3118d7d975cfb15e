pub mod screenshot;
pub mod task;

pub use screenshot::{download_url, EmptyReason, Screenshot, ScreenshotList, TASKS_API_PREFIX};
pub use task::{CreateTask, Status, Task};

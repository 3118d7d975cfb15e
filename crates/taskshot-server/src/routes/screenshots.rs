use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;
use taskshot_core::screenshot::ScreenshotList;
use taskshot_service::{ScreenshotService, ServiceError};
use tokio_util::io::ReaderStream;

use super::{to_error, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks/{task_id}/screenshots", get(list_screenshots))
        .route(
            "/api/v1/tasks/{task_id}/screenshots/{filename}",
            get(download_screenshot),
        )
}

async fn list_screenshots(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<ScreenshotList>, (StatusCode, Json<Value>)> {
    state
        .service
        .list_screenshots(&task_id)
        .await
        .map(Json)
        .map_err(to_error)
}

async fn download_screenshot(
    State(state): State<AppState>,
    Path((task_id, filename)): Path<(String, String)>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let shot = state
        .service
        .open_screenshot(&task_id, &filename)
        .await
        .map_err(to_error)?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, shot.size_bytes)
        .header(header::CONTENT_DISPOSITION, content_disposition(&filename))
        .body(Body::from_stream(ReaderStream::new(shot.file)))
        .map_err(|e| to_error(ServiceError::Internal(format!("build response: {e}"))))
}

/// `attachment` disposition suggesting `filename`. Names that are not plain
/// printable ASCII go through the RFC 5987 `filename*` form instead.
fn content_disposition(filename: &str) -> HeaderValue {
    let plain = filename
        .bytes()
        .all(|b| b.is_ascii_graphic() && b != b'"' && b != b'\\' || b == b' ');
    let value = if plain {
        format!("attachment; filename=\"{filename}\"")
    } else {
        format!(
            "attachment; filename*=UTF-8''{}",
            utf8_percent_encode(filename, NON_ALPHANUMERIC)
        )
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

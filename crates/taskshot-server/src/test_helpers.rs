use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use taskshot_core::task::CreateTask;
use taskshot_db::{Database, SqliteDatabase};
use taskshot_service::LocalService;
use taskshot_store::{ScreenshotStore, StoreConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::routes::{build_router, InnerAppState};

/// A router over an in-memory task registry and a temporary screenshot tree.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<dyn Database>,
    tmp: TempDir,
}

impl TestApp {
    pub fn screenshot_dir(&self) -> PathBuf {
        self.tmp.path().join("screenshots")
    }

    /// Register a task with the given id.
    pub async fn add_task(&self, id: &str) {
        self.db
            .create_task(&CreateTask {
                id: Some(id.into()),
                workflow_type: "test".into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }
}

pub async fn test_app() -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let db: Arc<dyn Database> = Arc::new(SqliteDatabase::open_in_memory().unwrap());
    let store = Arc::new(ScreenshotStore::new(&StoreConfig {
        screenshot_dir: Some(tmp.path().join("screenshots")),
    }));
    let state = Arc::new(InnerAppState {
        service: LocalService::new(db.clone(), store),
    });
    TestApp {
        router: build_router(state),
        db,
        tmp,
    }
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    pub app: TestApp,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port.
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_app().await;
    let router = app.router.clone();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    TestServer {
        base_url,
        app,
        _handle: handle,
    }
}

pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use taskshot_db::Database;
use taskshot_service::LocalService;
use taskshot_store::ScreenshotStore;
use tokio::net::TcpListener;

pub use routes::{build_router, AppState, InnerAppState};

pub async fn serve(
    listener: TcpListener,
    db: Arc<dyn Database>,
    store: Arc<ScreenshotStore>,
) -> Result<()> {
    let state = Arc::new(InnerAppState {
        service: LocalService::new(db, store),
    });
    let app = build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

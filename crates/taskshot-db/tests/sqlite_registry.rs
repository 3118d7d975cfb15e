// Exercises the task registry through the `Database` trait object, the way
// the service layer holds it.

use std::sync::Arc;

use taskshot_core::task::{CreateTask, Status};
use taskshot_db::{Database, DbConfig, DbError};

fn make_db() -> Arc<dyn Database> {
    Arc::new(taskshot_db::SqliteDatabase::open_in_memory().unwrap())
}

#[tokio::test]
async fn task_lifecycle_via_trait() {
    let db = make_db();

    let created = db
        .create_task(&CreateTask {
            id: Some("T1".into()),
            workflow_type: "invoice_entry".into(),
            query: "enter invoice INV-9".into(),
            status: Status::Pending,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "T1");
    assert_eq!(created.created_at, created.updated_at);

    let fetched = db.get_task("T1").await.unwrap();
    assert_eq!(fetched.workflow_type, "invoice_entry");

    assert_eq!(db.list_tasks().await.unwrap().len(), 1);

    db.delete_task("T1").await.unwrap();
    assert!(matches!(db.get_task("T1").await, Err(DbError::NotFound(_))));
    assert!(db.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let db = make_db();
    let err = db.get_task("missing").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

#[tokio::test]
async fn file_database_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let config = DbConfig {
        sqlite_path: Some(tmp.path().join("taskshot.db")),
    };

    {
        let db = taskshot_db::open_database(&config).unwrap();
        db.create_task(&CreateTask {
            id: Some("persisted".into()),
            workflow_type: "tracking".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let db = taskshot_db::open_database(&config).unwrap();
    let task = db.get_task("persisted").await.unwrap();
    assert_eq!(task.status, Status::Pending);
}

use chrono::Utc;
use rusqlite::{params, Row};

use taskshot_core::task::{CreateTask, Status, Task};

use super::super::{map_sqlite_err, SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let status_str: String = row.get("status")?;
    Ok(Task {
        id: row.get("id")?,
        workflow_type: row.get("workflow_type")?,
        query: row.get("query")?,
        status: Status::parse_str(&status_str).unwrap_or(Status::Pending),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl SqliteDatabase {
    pub fn create_task_sync(&self, input: &CreateTask) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            let id = match input.id.as_deref().map(str::trim) {
                Some("") => return Err(DbError::InvalidInput("task id must not be empty".into())),
                Some(id) => id.to_string(),
                None => uuid::Uuid::new_v4().to_string(),
            };
            let now = Utc::now();

            conn.execute(
                "INSERT INTO tasks (id, workflow_type, query, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    input.workflow_type,
                    input.query,
                    input.status.as_str(),
                    now,
                    now,
                ],
            )
            .map_err(|e| match map_sqlite_err(e) {
                DbError::Conflict(_) => DbError::Conflict(format!("task {id} already exists")),
                other => other,
            })?;

            conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
                .to_db()
        })
    }

    pub fn get_task_sync(&self, id: &str) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => {
                        DbError::NotFound(format!("task {id}"))
                    }
                    other => DbError::Internal(other.to_string()),
                })
        })
    }

    pub fn list_tasks_sync(&self) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM tasks ORDER BY created_at DESC, id ASC")
                .to_db()?;
            let rows = stmt.query_map([], row_to_task).to_db()?;
            rows.collect::<rusqlite::Result<Vec<_>>>().to_db()
        })
    }

    pub fn delete_task_sync(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute("DELETE FROM tasks WHERE id = ?1", params![id])
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }
}

use rusqlite::Connection;

use super::SqliteResultExt;
use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id            TEXT PRIMARY KEY,
            workflow_type TEXT NOT NULL,
            query         TEXT NOT NULL DEFAULT '',
            status        TEXT NOT NULL DEFAULT 'pending'
                              CHECK(status IN (
                                  'pending', 'in_progress', 'completed',
                                  'failed', 'cancelled'
                              )),
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);
        ",
    )
    .to_db()
}

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use super::{Store, StoreError, StoreResult};
use crate::model::{Comment, CommentId, TaskId};

fn comment_from_row(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl Store {
    pub fn create_comment(&self, task_id: TaskId, content: &str) -> StoreResult<Comment> {
        self.conn.execute(
            "INSERT INTO comments (task_id, content, created_at) VALUES (?1, ?2, ?3)",
            params![task_id, content, Utc::now()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, task_id, "created comment");
        self.get_comment(id)
    }

    pub fn get_comment(&self, id: CommentId) -> StoreResult<Comment> {
        self.conn
            .query_row(
                "SELECT id, task_id, content, created_at FROM comments WHERE id = ?1",
                params![id],
                comment_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    /// Comments on a task, oldest first
    pub fn task_comments(&self, task_id: TaskId) -> StoreResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, task_id, content, created_at FROM comments
             WHERE task_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let comments = stmt
            .query_map(params![task_id], comment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    pub fn delete_comment(&self, id: CommentId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(())
    }
}

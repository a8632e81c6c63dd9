use std::collections::BTreeSet;

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use super::{Store, StoreError, StoreResult};
use crate::model::{Tag, TagGroup, TagGroupId, TagId, TaskId};

const TAG_COLUMNS: &str = "id, name, color, tag_group_id, created_at";

pub(super) fn tag_from_row(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        group_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn group_from_row(row: &Row) -> rusqlite::Result<TagGroup> {
    Ok(TagGroup {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// How `sync_task_tags` converged a task's tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSync {
    pub added: Vec<TagId>,
    pub removed: Vec<TagId>,
}

impl Store {
    // -----------------------------------------------------------------------
    // Groups

    pub fn create_tag_group(&self, name: &str) -> StoreResult<TagGroup> {
        self.conn.execute(
            "INSERT INTO tag_groups (name, created_at) VALUES (?1, ?2)",
            params![name, Utc::now()],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(self.conn.query_row(
            "SELECT id, name, created_at FROM tag_groups WHERE id = ?1",
            params![id],
            group_from_row,
        )?)
    }

    pub fn list_tag_groups(&self) -> StoreResult<Vec<TagGroup>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM tag_groups ORDER BY name COLLATE NOCASE")?;
        let groups = stmt
            .query_map([], group_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    /// Delete a group; its tags survive ungrouped
    pub fn delete_tag_group(&self, id: TagGroupId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM tag_groups WHERE id = ?1", params![id])?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tags

    pub fn create_tag(&self, name: &str, color: &str, group_id: Option<TagGroupId>) -> StoreResult<Tag> {
        self.conn.execute(
            "INSERT INTO tags (name, color, tag_group_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, color, group_id, Utc::now()],
        )?;
        self.get_tag(self.conn.last_insert_rowid())
    }

    pub fn get_tag(&self, id: TagId) -> StoreResult<Tag> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], tag_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { entity: "tag", id })
    }

    /// Look a tag up by name, ignoring case
    pub fn tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags WHERE name = ?1 COLLATE NOCASE");
        Ok(self
            .conn
            .query_row(&sql, params![name], tag_from_row)
            .optional()?)
    }

    /// All tags, by name
    pub fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name COLLATE NOCASE");
        let mut stmt = self.conn.prepare(&sql)?;
        let tags = stmt
            .query_map([], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    pub fn tags_in_group(&self, group_id: TagGroupId) -> StoreResult<Vec<Tag>> {
        let sql = format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE tag_group_id = ?1 ORDER BY name COLLATE NOCASE"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tags = stmt
            .query_map(params![group_id], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    pub fn update_tag(
        &self,
        id: TagId,
        name: &str,
        color: &str,
        group_id: Option<TagGroupId>,
    ) -> StoreResult<()> {
        let affected = self.conn.execute(
            "UPDATE tags SET name = ?2, color = ?3, tag_group_id = ?4 WHERE id = ?1",
            params![id, name, color, group_id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "tag", id });
        }
        Ok(())
    }

    pub fn delete_tag(&self, id: TagId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Task assignment

    /// Attach a tag to a task. If the tag belongs to a group, every other tag of
    /// that group is detached from the task first.
    pub fn add_tag_to_task(&self, task_id: TaskId, tag_id: TagId) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.attach_tag(task_id, tag_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Group-exclusive attach without a transaction of its own
    fn attach_tag(&self, task_id: TaskId, tag_id: TagId) -> StoreResult<()> {
        let group_id: Option<TagGroupId> = self
            .conn
            .query_row(
                "SELECT tag_group_id FROM tags WHERE id = ?1",
                params![tag_id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "tag",
                id: tag_id,
            })?;

        if let Some(group_id) = group_id {
            self.conn.execute(
                "DELETE FROM task_tags
                 WHERE task_id = ?1 AND tag_id != ?2
                   AND tag_id IN (SELECT id FROM tags WHERE tag_group_id = ?3)",
                params![task_id, tag_id, group_id],
            )?;
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2)",
            params![task_id, tag_id],
        )?;
        tracing::debug!(task_id, tag_id, "tag added");
        Ok(())
    }

    pub fn remove_tag_from_task(&self, task_id: TaskId, tag_id: TagId) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2",
            params![task_id, tag_id],
        )?;
        tracing::debug!(task_id, tag_id, "tag removed");
        Ok(())
    }

    /// Converge a task's tags onto `desired` with the fewest add/remove calls.
    /// Removals run first so group-exclusive adds never fight them.
    pub fn sync_task_tags(&self, task_id: TaskId, desired: &BTreeSet<TagId>) -> StoreResult<TagSync> {
        let tx = self.conn.unchecked_transaction()?;
        let sync = self.apply_tag_sync(task_id, desired)?;
        tx.commit()?;
        Ok(sync)
    }

    /// `sync_task_tags` for callers that already hold a transaction
    pub(super) fn apply_tag_sync(
        &self,
        task_id: TaskId,
        desired: &BTreeSet<TagId>,
    ) -> StoreResult<TagSync> {
        let current: BTreeSet<TagId> = self.task_tags(task_id)?.iter().map(|t| t.id).collect();
        let sync = TagSync {
            added: desired.difference(&current).copied().collect(),
            removed: current.difference(desired).copied().collect(),
        };
        for &tag_id in &sync.removed {
            self.remove_tag_from_task(task_id, tag_id)?;
        }
        for &tag_id in &sync.added {
            self.attach_tag(task_id, tag_id)?;
        }
        Ok(sync)
    }
}

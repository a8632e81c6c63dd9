use std::collections::BTreeSet;

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use super::tags::{TagSync, tag_from_row};
use super::{Store, StoreError, StoreResult, like_pattern};
use crate::model::{MAX_PRIORITY, ProjectId, Tag, TagId, Task, TaskFields, TaskId};

const TASK_COLUMNS: &str =
    "t.id, t.project_id, t.title, t.description, t.notes, t.priority, t.created_at, t.updated_at";

const TASK_ORDER: &str = "ORDER BY t.priority DESC, t.created_at DESC, t.id DESC";

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        notes: row.get(4)?,
        priority: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        tags: Vec::new(),
    })
}

impl Store {
    pub fn create_task(&self, project_id: ProjectId, fields: &TaskFields) -> StoreResult<Task> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (project_id, title, description, notes, priority, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                project_id,
                fields.title,
                fields.description,
                fields.notes,
                fields.priority.min(MAX_PRIORITY),
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, project_id, "created task");
        self.get_task(id)
    }

    pub fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.find_task(id)?
            .ok_or(StoreError::NotFound { entity: "task", id })
    }

    /// Load one task with its tags
    pub fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = ?1");
        let task = self
            .conn
            .query_row(&sql, params![id], task_from_row)
            .optional()?;
        match task {
            Some(mut task) => {
                task.tags = self.task_tags(task.id)?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// Every task in a project, highest priority then newest first
    pub fn list_tasks(&self, project_id: ProjectId) -> StoreResult<Vec<Task>> {
        self.list_tasks_filtered(project_id, "", None, None)
    }

    /// Tasks in a project matching the filters, highest priority then newest first.
    ///
    /// `search` matches title or description as a case-insensitive substring;
    /// `tag_id` keeps only tasks carrying that tag; `exclude_tag_id` drops tasks
    /// carrying that one.
    pub fn list_tasks_filtered(
        &self,
        project_id: ProjectId,
        search: &str,
        tag_id: Option<TagId>,
        exclude_tag_id: Option<TagId>,
    ) -> StoreResult<Vec<Task>> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.project_id = ?1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(project_id)];

        let search = search.trim();
        if !search.is_empty() {
            args.push(Box::new(like_pattern(search)));
            let n = args.len();
            sql.push_str(&format!(
                " AND (t.title LIKE ?{n} ESCAPE '\\' OR t.description LIKE ?{n} ESCAPE '\\')"
            ));
        }
        if let Some(tag_id) = tag_id {
            args.push(Box::new(tag_id));
            sql.push_str(&format!(
                " AND t.id IN (SELECT task_id FROM task_tags WHERE tag_id = ?{})",
                args.len()
            ));
        }
        if let Some(exclude) = exclude_tag_id {
            args.push(Box::new(exclude));
            sql.push_str(&format!(
                " AND t.id NOT IN (SELECT task_id FROM task_tags WHERE tag_id = ?{})",
                args.len()
            ));
        }
        sql.push(' ');
        sql.push_str(TASK_ORDER);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut tasks = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        for task in &mut tasks {
            task.tags = self.task_tags(task.id)?;
        }
        tracing::trace!(project_id, count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    pub fn update_task(&self, id: TaskId, fields: &TaskFields) -> StoreResult<()> {
        let affected = self.conn.execute(
            "UPDATE tasks SET title = ?2, description = ?3, notes = ?4, priority = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                id,
                fields.title,
                fields.description,
                fields.notes,
                fields.priority.min(MAX_PRIORITY),
                Utc::now()
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    /// Delete a task with its tag links and comments
    /// Create or update a task and converge its tags in one transaction.
    /// `task_id` is None for a new task. Nothing is written if any step fails.
    pub fn save_task(
        &self,
        project_id: ProjectId,
        task_id: Option<TaskId>,
        fields: &TaskFields,
        tags: &BTreeSet<TagId>,
    ) -> StoreResult<(TaskId, TagSync)> {
        let tx = self.conn.unchecked_transaction()?;
        let id = match task_id {
            Some(id) => {
                self.update_task(id, fields)?;
                id
            }
            None => self.create_task(project_id, fields)?.id,
        };
        let sync = self.apply_tag_sync(id, tags)?;
        tx.commit()?;
        Ok((id, sync))
    }

    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        tracing::debug!(id, "deleted task");
        Ok(())
    }

    /// Tags on a task, by name
    pub fn task_tags(&self, task_id: TaskId) -> StoreResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT tg.id, tg.name, tg.color, tg.tag_group_id, tg.created_at
             FROM tags tg JOIN task_tags tt ON tg.id = tt.tag_id
             WHERE tt.task_id = ?1
             ORDER BY tg.name COLLATE NOCASE",
        )?;
        let tags = stmt
            .query_map(params![task_id], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

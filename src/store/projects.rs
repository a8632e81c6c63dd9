use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use super::{Store, StoreError, StoreResult};
use crate::model::{Project, ProjectId};

const PROJECT_COLUMNS: &str = "id, title, description, created_at, updated_at";

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl Store {
    pub fn create_project(&self, title: &str, description: &str) -> StoreResult<Project> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO projects (title, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![title, description, now],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, title, "created project");
        self.get_project(id)
    }

    pub fn get_project(&self, id: ProjectId) -> StoreResult<Project> {
        self.find_project(id)?.ok_or(StoreError::NotFound {
            entity: "project",
            id,
        })
    }

    pub fn find_project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], project_from_row)
            .optional()?)
    }

    /// All projects, most recently updated first
    pub fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY updated_at DESC, id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn update_project(&self, id: ProjectId, title: &str, description: &str) -> StoreResult<()> {
        let affected = self.conn.execute(
            "UPDATE projects SET title = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![id, title, description, Utc::now()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    /// Delete a project; its tasks, their tags and comments go with it
    pub fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        tracing::debug!(id, "deleted project");
        Ok(())
    }

    pub fn project_count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskFields;

    #[test]
    fn create_get_update() {
        let store = Store::open_in_memory().unwrap();
        let p = store.create_project("Alpha", "first").unwrap();
        assert_eq!(p.title, "Alpha");
        assert_eq!(p.description, "first");

        store.update_project(p.id, "Alpha 2", "renamed").unwrap();
        let p2 = store.get_project(p.id).unwrap();
        assert_eq!(p2.title, "Alpha 2");
        assert!(p2.updated_at >= p.updated_at);
    }

    #[test]
    fn update_missing_project_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let err = store.update_project(42, "x", "").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42, .. }));
    }

    #[test]
    fn list_orders_by_recent_update() {
        let store = Store::open_in_memory().unwrap();
        let a = store.create_project("A", "").unwrap();
        let _b = store.create_project("B", "").unwrap();
        store.update_project(a.id, "A", "touched").unwrap();
        let titles: Vec<String> = store
            .list_projects()
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(store.project_count().unwrap(), 2);
    }

    #[test]
    fn delete_cascades_to_tasks() {
        let store = Store::open_in_memory().unwrap();
        let p = store.create_project("Doomed", "").unwrap();
        let t = store
            .create_task(
                p.id,
                &TaskFields {
                    title: "child".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        store.delete_project(p.id).unwrap();
        assert!(store.find_project(p.id).unwrap().is_none());
        assert!(store.find_task(t.id).unwrap().is_none());
    }
}

use chrono::Utc;
use rusqlite::{Connection, Transaction, params};

use super::StoreResult;
use crate::model::{STATUS_GROUP, STATUS_TAGS};

/// One schema step, applied inside a transaction
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> StoreResult<()>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial schema and status tags",
    up: initial_schema,
}];

pub(super) const LATEST: u32 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    priority INTEGER NOT NULL DEFAULT 0 CHECK (priority BETWEEN 0 AND 10),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX idx_tasks_project ON tasks(project_id, priority DESC, created_at DESC);

CREATE TABLE tag_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    created_at TEXT NOT NULL
);

CREATE TABLE tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    color TEXT NOT NULL DEFAULT '#c0caf5',
    tag_group_id INTEGER REFERENCES tag_groups(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE task_tags (
    task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (task_id, tag_id)
);
CREATE INDEX idx_task_tags_tag ON task_tags(tag_id);

CREATE TABLE comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX idx_comments_task ON comments(task_id, created_at);

CREATE TABLE settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

fn initial_schema(tx: &Transaction) -> StoreResult<()> {
    tx.execute_batch(SCHEMA_V1)?;

    let now = Utc::now();
    tx.execute(
        "INSERT INTO tag_groups (name, created_at) VALUES (?1, ?2)",
        params![STATUS_GROUP, now],
    )?;
    let group_id = tx.last_insert_rowid();
    for (name, color) in STATUS_TAGS {
        tx.execute(
            "INSERT INTO tags (name, color, tag_group_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, color, group_id, now],
        )?;
    }
    Ok(())
}

/// Current schema version (`PRAGMA user_version`)
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Apply every migration newer than the database's version
pub(super) fn run(conn: &mut Connection) -> StoreResult<()> {
    let current = schema_version(conn)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.transaction()?;
        (migration.up)(&tx)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        tracing::info!(
            version = migration.version,
            name = migration.name,
            "applied migration"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_and_end_at_latest() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(versions, sorted);
        assert_eq!(versions.last().copied(), Some(LATEST));
    }

    #[test]
    fn run_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn).unwrap();
        run(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), LATEST);
        let groups: i64 = conn
            .query_row("SELECT COUNT(*) FROM tag_groups", [], |r| r.get(0))
            .unwrap();
        assert_eq!(groups, 1);
    }

    #[test]
    fn seeds_status_tags() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn).unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT t.name FROM tags t JOIN tag_groups g ON g.id = t.tag_group_id
                 WHERE g.name = 'Status' ORDER BY t.id",
            )
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names, vec!["design", "todo", "active", "complete"]);
    }
}

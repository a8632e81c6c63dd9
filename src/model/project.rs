use chrono::{DateTime, Utc};

pub type ProjectId = i64;

/// A project owns tasks; deleting it cascades to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

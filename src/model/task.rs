use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::project::ProjectId;
use super::tag::{Tag, TagId};

pub type TaskId = i64;
pub type CommentId = i64;

/// Highest allowed priority; the lowest is 0
pub const MAX_PRIORITY: u8 = 10;

/// A task with its tags attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub notes: String,
    /// 0..=10, higher sorts first
    pub priority: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

impl Task {
    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    pub fn tag_ids(&self) -> BTreeSet<TagId> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

/// Editable task fields, as written by create and update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub notes: String,
    pub priority: u8,
}

/// A comment on a task. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Clamp a parsed priority into 0..=MAX_PRIORITY
pub fn clamp_priority(value: i64) -> u8 {
    value.clamp(0, MAX_PRIORITY as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_priority_bounds() {
        assert_eq!(clamp_priority(-4), 0);
        assert_eq!(clamp_priority(0), 0);
        assert_eq!(clamp_priority(7), 7);
        assert_eq!(clamp_priority(10), 10);
        assert_eq!(clamp_priority(99), 10);
    }
}

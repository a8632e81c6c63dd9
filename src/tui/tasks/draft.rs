use std::collections::BTreeSet;

use crate::model::{ProjectId, TagId, Task, TaskFields, TaskId, clamp_priority};
use crate::tui::text::TextBuffer;
use crate::tui::worker::TaskSave;

/// Edit form fields, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    Notes,
    Priority,
    Tags,
    Save,
}

/// What Enter does on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    Advance,
    Newline,
    ToggleTag,
    Submit,
}

impl EditField {
    pub const ALL: [EditField; 6] = [
        EditField::Title,
        EditField::Description,
        EditField::Notes,
        EditField::Priority,
        EditField::Tags,
        EditField::Save,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn enter_action(self) -> EnterAction {
        match self {
            EditField::Title | EditField::Priority => EnterAction::Advance,
            EditField::Description | EditField::Notes => EnterAction::Newline,
            EditField::Tags => EnterAction::ToggleTag,
            EditField::Save => EnterAction::Submit,
        }
    }

    /// Whether a typed char may go into this field
    pub fn accepts(self, c: char) -> bool {
        match self {
            EditField::Priority => c.is_ascii_digit(),
            EditField::Tags | EditField::Save => false,
            _ => true,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditField::Title => "Title",
            EditField::Description => "Description",
            EditField::Notes => "Notes",
            EditField::Priority => "Priority",
            EditField::Tags => "Tags",
            EditField::Save => "Save",
        }
    }
}

/// Uncommitted copy of a task being created or edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// None for a new task
    pub task_id: Option<TaskId>,
    pub field: EditField,
    pub title: TextBuffer,
    pub description: TextBuffer,
    pub notes: TextBuffer,
    pub priority: TextBuffer,
    pub tags: BTreeSet<TagId>,
    pub tag_cursor: usize,
}

impl EditSession {
    pub fn new_task() -> Self {
        EditSession {
            task_id: None,
            field: EditField::Title,
            title: TextBuffer::single_line(),
            description: TextBuffer::multi_line(),
            notes: TextBuffer::multi_line(),
            priority: TextBuffer::single_line().with_limit(2).with_text("0"),
            tags: BTreeSet::new(),
            tag_cursor: 0,
        }
    }

    pub fn for_task(task: &Task) -> Self {
        EditSession {
            task_id: Some(task.id),
            title: TextBuffer::single_line().with_text(&task.title),
            description: TextBuffer::multi_line().with_text(&task.description),
            notes: TextBuffer::multi_line().with_text(&task.notes),
            priority: TextBuffer::single_line()
                .with_limit(2)
                .with_text(&task.priority.to_string()),
            tags: task.tag_ids(),
            ..Self::new_task()
        }
    }

    pub fn is_new(&self) -> bool {
        self.task_id.is_none()
    }

    /// Text buffer behind the focused field, if it has one
    pub fn focused_buffer(&mut self) -> Option<&mut TextBuffer> {
        match self.field {
            EditField::Title => Some(&mut self.title),
            EditField::Description => Some(&mut self.description),
            EditField::Notes => Some(&mut self.notes),
            EditField::Priority => Some(&mut self.priority),
            EditField::Tags | EditField::Save => None,
        }
    }

    /// Flip one tag in the staged set. Groups are left alone here; the store
    /// applies group exclusion when the draft is saved.
    pub fn toggle_tag(&mut self, tag_id: TagId) {
        if !self.tags.remove(&tag_id) {
            self.tags.insert(tag_id);
        }
    }

    pub fn move_tag_cursor(&mut self, delta: isize, tag_count: usize) {
        if tag_count == 0 {
            self.tag_cursor = 0;
            return;
        }
        let next = self.tag_cursor as isize + delta;
        self.tag_cursor = next.clamp(0, tag_count as isize - 1) as usize;
    }

    /// Trimmed, clamped write for this draft. None when the title is blank,
    /// which means the draft is dropped.
    pub fn to_save(&self, project_id: ProjectId) -> Option<TaskSave> {
        let title = self.title.text().trim();
        if title.is_empty() {
            return None;
        }
        let priority = self.priority.text().trim().parse::<i64>().unwrap_or(0);
        Some(TaskSave {
            project_id,
            task_id: self.task_id,
            fields: TaskFields {
                title: title.to_string(),
                description: self.description.text().trim().to_string(),
                notes: self.notes.text().trim().to_string(),
                priority: clamp_priority(priority),
            },
            tags: self.tags.clone(),
        })
    }
}

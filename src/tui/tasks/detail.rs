use crate::model::{Comment, TaskId};
use crate::tui::text::TextBuffer;
use crate::tui::worker::Generation;

/// State of the task detail view: the comment thread and the comment input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    pub task_id: TaskId,
    pub comments: Vec<Comment>,
    pub input: TextBuffer,
    /// Keys go to the comment input
    pub composing: bool,
    pub loading: bool,
    generation: Generation,
}

impl DetailSession {
    pub fn new(task_id: TaskId, generation: Generation) -> Self {
        DetailSession {
            task_id,
            comments: Vec::new(),
            input: TextBuffer::multi_line(),
            composing: false,
            loading: true,
            generation,
        }
    }

    /// Expect the comment load stamped `generation`
    pub fn begin_load(&mut self, generation: Generation) {
        self.generation = generation;
        self.loading = true;
    }

    /// Take loaded comments unless they belong to another task or an older load
    pub fn accept(&mut self, generation: Generation, task_id: TaskId, comments: Vec<Comment>) -> bool {
        if task_id != self.task_id || generation < self.generation {
            return false;
        }
        self.comments = comments;
        self.loading = false;
        true
    }

    /// A comment load failed. Returns false when the failure is for another
    /// task or an older load and should be ignored.
    pub fn fail_load(&mut self, generation: Generation, task_id: TaskId) -> bool {
        if task_id != self.task_id || generation < self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Trimmed comment text, or None when there is nothing to send
    pub fn submission(&self) -> Option<String> {
        let content = self.input.text().trim();
        (!content.is_empty()).then(|| content.to_string())
    }

    /// The comment went through
    pub fn submitted(&mut self) {
        self.input.clear();
        self.composing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: i64, task_id: TaskId) -> Comment {
        Comment {
            id,
            task_id,
            content: format!("c{id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn whitespace_comment_is_not_submitted() {
        let mut s = DetailSession::new(1, 1);
        s.input.set_text("  \n ");
        assert_eq!(s.submission(), None);
        s.input.set_text(" hi\n");
        assert_eq!(s.submission().as_deref(), Some("hi"));
    }

    #[test]
    fn ignores_comments_for_other_task_or_older_load() {
        let mut s = DetailSession::new(1, 3);
        assert!(!s.accept(3, 2, vec![comment(1, 2)]));
        assert!(!s.accept(2, 1, vec![comment(1, 1)]));
        assert!(s.loading);
        assert!(s.accept(3, 1, vec![comment(1, 1), comment(2, 1)]));
        assert_eq!(s.comments.len(), 2);
        assert!(!s.loading);
    }

    #[test]
    fn failed_load_stops_loading_only_when_current() {
        let mut s = DetailSession::new(1, 3);
        assert!(!s.fail_load(2, 1));
        assert!(!s.fail_load(3, 2));
        assert!(s.loading);
        assert!(s.fail_load(3, 1));
        assert!(!s.loading);
    }

    #[test]
    fn submitted_clears_and_unfocuses() {
        let mut s = DetailSession::new(1, 1);
        s.composing = true;
        s.input.set_text("done");
        s.submitted();
        assert!(s.input.is_empty());
        assert!(!s.composing);
    }
}

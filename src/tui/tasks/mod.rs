//! The task-list screen: a mode machine over a working set of tasks.
//!
//! Keys are routed by `tui::input` according to `Mode`; data access only
//! happens through requests queued here and answered by the worker.

mod detail;
mod draft;
mod working_set;

pub use detail::DetailSession;
pub use draft::{EditField, EditSession, EnterAction};
pub use working_set::WorkingSet;

use crossterm::event::KeyEvent;

use super::Transition;
use super::scroll::visible_items;
use super::worker::{Generation, Request, Response};
use crate::model::{Project, Task, TaskId};

/// Rows outside the list: header, filter bar, list borders, status line
pub const CHROME_ROWS: u16 = 7;
/// Rows each task takes in the list
pub const ROWS_PER_ITEM: u16 = 3;

/// Which part of the screen has focus in Normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Back,
    Search,
    TagFilter,
    List,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Back, Focus::Search, Focus::TagFilter, Focus::List];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    TagDropdown { cursor: usize },
    Editing(EditSession),
    Viewing(DetailSession),
    AssigningTags { task_id: TaskId, cursor: usize },
    ConfirmingDelete { task_id: TaskId, title: String },
    Help { prior: Box<Mode> },
}

pub struct TaskListView {
    pub project: Project,
    pub mode: Mode,
    pub focus: Focus,
    pub set: WorkingSet,
    /// Transient message for the status line, cleared on the next key
    pub status: Option<String>,
    comment_generation: Generation,
    outbox: Vec<Request>,
}

impl TaskListView {
    pub fn new(project: Project) -> Self {
        let set = WorkingSet::new(project.id);
        TaskListView {
            project,
            mode: Mode::Normal,
            focus: Focus::List,
            set,
            status: None,
            comment_generation: 0,
            outbox: Vec::new(),
        }
    }

    /// Newest stamp on any load this view has issued
    pub fn generation(&self) -> Generation {
        self.set.generation().max(self.comment_generation)
    }

    /// Number loads after `floor`, the last stamp of the view this one replaces
    pub fn resume_after(&mut self, floor: Generation) {
        self.set.resume_after(floor);
        self.comment_generation = self.comment_generation.max(floor);
    }

    /// Queue the initial tag and task loads
    pub fn start(&mut self) {
        self.request(Request::LoadTags);
        self.reload();
    }

    pub fn request(&mut self, request: Request) {
        self.outbox.push(request);
    }

    /// Requests queued since the last call, oldest first
    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn reload(&mut self) {
        let request = self.set.next_load();
        self.request(request);
    }

    pub fn resize(&mut self, _width: u16, height: u16) {
        let rows = height.saturating_sub(CHROME_ROWS);
        self.set.scroll.set_visible(visible_items(rows, ROWS_PER_ITEM));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Transition {
        super::input::handle_task_key(self, key)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.set.selected()
    }

    /// The task the current mode is about, if any
    pub fn active_task(&self) -> Option<&Task> {
        match &self.mode {
            Mode::Viewing(session) => self.set.task(session.task_id),
            Mode::AssigningTags { task_id, .. } => self.set.task(*task_id),
            Mode::Help { prior } => match prior.as_ref() {
                Mode::Viewing(session) => self.set.task(session.task_id),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn start_new_task(&mut self) {
        self.mode = Mode::Editing(EditSession::new_task());
    }

    pub fn start_edit(&mut self, task_id: TaskId) {
        match self.set.task(task_id) {
            Some(task) => self.mode = Mode::Editing(EditSession::for_task(task)),
            None => self.mode = Mode::Normal,
        }
    }

    pub fn confirm_delete(&mut self, task_id: TaskId) {
        match self.set.task(task_id) {
            Some(task) => {
                self.mode = Mode::ConfirmingDelete {
                    task_id,
                    title: task.title.clone(),
                }
            }
            None => self.mode = Mode::Normal,
        }
    }

    pub fn assign_tags(&mut self, task_id: TaskId) {
        self.mode = if self.set.contains(task_id) {
            Mode::AssigningTags { task_id, cursor: 0 }
        } else {
            Mode::Normal
        };
    }

    pub fn open_detail(&mut self, task_id: TaskId) {
        self.comment_generation += 1;
        self.mode = Mode::Viewing(DetailSession::new(task_id, self.comment_generation));
        self.request(Request::LoadComments {
            generation: self.comment_generation,
            task_id,
        });
    }

    fn reload_comments(&mut self) {
        let Mode::Viewing(session) = &mut self.mode else {
            return;
        };
        self.comment_generation += 1;
        session.begin_load(self.comment_generation);
        let task_id = session.task_id;
        self.request(Request::LoadComments {
            generation: self.comment_generation,
            task_id,
        });
    }

    pub fn open_help(&mut self) {
        let prior = std::mem::replace(&mut self.mode, Mode::Normal);
        self.mode = Mode::Help {
            prior: Box::new(prior),
        };
    }

    /// Log a failed operation and show it on the status line
    fn fail(&mut self, what: &str, err: &dyn std::fmt::Display) {
        tracing::warn!(error = %err, "{what} failed");
        self.status = Some(format!("{what} failed: {err}"));
    }

    pub fn handle_response(&mut self, response: Response) {
        match response {
            Response::TagsLoaded(Ok(tags)) => {
                self.set.set_tags(tags);
                self.clamp_tag_cursors();
            }
            Response::TagsLoaded(Err(e)) => self.fail("loading tags", &e),
            Response::TasksLoaded { project_id, .. } if project_id != self.project.id => {
                tracing::trace!(project_id, "dropping task list for another project");
            }
            Response::TasksLoaded {
                generation, result, ..
            } => match result {
                Ok(page) => {
                    if self.set.accept(generation, page) {
                        self.reconcile();
                    }
                }
                Err(e) => {
                    if !self.set.is_stale(generation) {
                        self.set.loading = false;
                        self.fail("loading tasks", &e);
                    }
                }
            },
            Response::TaskSaved(Ok(id)) => {
                tracing::debug!(id, "task saved");
                self.reload();
            }
            Response::TaskSaved(Err(e)) => self.fail("saving task", &e),
            Response::TaskDeleted(Ok(())) => self.reload(),
            Response::TaskDeleted(Err(e)) => self.fail("deleting task", &e),
            Response::TaskTagSet(Ok(())) => self.reload(),
            Response::TaskTagSet(Err(e)) => self.fail("updating tags", &e),
            Response::CommentsLoaded {
                generation,
                task_id,
                result,
            } => match result {
                Ok(comments) => {
                    if let Mode::Viewing(session) = &mut self.mode {
                        session.accept(generation, task_id, comments);
                    }
                }
                Err(e) => {
                    if let Mode::Viewing(session) = &mut self.mode
                        && session.fail_load(generation, task_id)
                    {
                        self.fail("loading comments", &e);
                    }
                }
            },
            Response::CommentAdded(Ok(comment)) => {
                if let Mode::Viewing(session) = &mut self.mode
                    && session.task_id == comment.task_id
                {
                    session.submitted();
                    self.reload_comments();
                }
            }
            Response::CommentAdded(Err(e)) => self.fail("adding comment", &e),
            other => tracing::trace!(?other, "task view ignoring response"),
        }
    }

    /// Repair state that points at tasks the latest load no longer has
    fn reconcile(&mut self) {
        let stale = |mode: &Mode| match mode {
            Mode::AssigningTags { task_id, .. } => !self.set.contains(*task_id),
            Mode::Viewing(session) => !self.set.contains(session.task_id),
            _ => false,
        };
        if stale(&self.mode) {
            tracing::debug!("selected task vanished on reload; closing panel");
            self.mode = Mode::Normal;
        } else if let Mode::Help { prior } = &self.mode
            && stale(prior)
        {
            self.mode = Mode::Help {
                prior: Box::new(Mode::Normal),
            };
        }
    }

    fn clamp_tag_cursors(&mut self) {
        let count = self.set.tags.len();
        let last = count.saturating_sub(1);
        match &mut self.mode {
            Mode::TagDropdown { cursor } => *cursor = (*cursor).min(count),
            Mode::AssigningTags { cursor, .. } => *cursor = (*cursor).min(last),
            Mode::Editing(session) => session.tag_cursor = session.tag_cursor.min(last),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::worker::TaskPage;
    use chrono::Utc;

    fn project() -> Project {
        Project {
            id: 1,
            title: "P".into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(id: TaskId) -> Task {
        Task {
            id,
            project_id: 1,
            title: format!("task {id}"),
            description: String::new(),
            notes: String::new(),
            priority: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            tags: Vec::new(),
        }
    }

    fn load(view: &mut TaskListView, ids: &[TaskId]) {
        view.reload();
        let generation = view
            .drain_requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::LoadTasks { generation, .. } => Some(generation),
                _ => None,
            })
            .last()
            .unwrap();
        view.handle_response(Response::TasksLoaded {
            project_id: 1,
            generation,
            result: Ok(TaskPage {
                tasks: ids.iter().copied().map(task).collect(),
                completed_tag: None,
            }),
        });
    }

    #[test]
    fn focus_cycles() {
        assert_eq!(Focus::List.next(), Focus::Back);
        assert_eq!(Focus::Back.prev(), Focus::List);
        assert_eq!(Focus::Search.next(), Focus::TagFilter);
    }

    #[test]
    fn start_queues_tags_then_tasks() {
        let mut view = TaskListView::new(project());
        view.start();
        let requests = view.drain_requests();
        assert!(matches!(requests[0], Request::LoadTags));
        assert!(matches!(requests[1], Request::LoadTasks { generation: 1, .. }));
        assert!(view.drain_requests().is_empty());
    }

    #[test]
    fn resize_derives_visible_rows() {
        let mut view = TaskListView::new(project());
        view.resize(80, 24);
        assert_eq!(view.set.scroll.visible(), 5);
        view.resize(80, 3);
        assert_eq!(view.set.scroll.visible(), 1);
    }

    #[test]
    fn reload_closes_detail_for_vanished_task() {
        let mut view = TaskListView::new(project());
        load(&mut view, &[1, 2]);
        view.open_detail(2);
        load(&mut view, &[1]);
        assert_eq!(view.mode, Mode::Normal);
    }

    #[test]
    fn reload_closes_assign_behind_help() {
        let mut view = TaskListView::new(project());
        load(&mut view, &[1, 2]);
        view.assign_tags(2);
        view.open_help();
        load(&mut view, &[1]);
        assert_eq!(
            view.mode,
            Mode::Help {
                prior: Box::new(Mode::Normal)
            }
        );
    }

    #[test]
    fn failed_load_sets_status_and_keeps_mode() {
        let mut view = TaskListView::new(project());
        load(&mut view, &[1]);
        view.reload();
        view.drain_requests();
        view.handle_response(Response::TasksLoaded {
            project_id: 1,
            generation: 2,
            result: Err(crate::store::StoreError::NotFound {
                entity: "project",
                id: 1,
            }),
        });
        assert_eq!(view.mode, Mode::Normal);
        assert_eq!(view.set.tasks.len(), 1);
        assert!(view.status.as_deref().unwrap().contains("loading tasks failed"));
    }

    #[test]
    fn comment_added_clears_input_and_reloads() {
        let mut view = TaskListView::new(project());
        load(&mut view, &[1]);
        view.open_detail(1);
        view.drain_requests();
        if let Mode::Viewing(s) = &mut view.mode {
            s.composing = true;
            s.input.set_text("note");
        }
        view.handle_response(Response::CommentAdded(Ok(crate::model::Comment {
            id: 1,
            task_id: 1,
            content: "note".into(),
            created_at: Utc::now(),
        })));
        let Mode::Viewing(s) = &view.mode else {
            panic!("left detail view");
        };
        assert!(s.input.is_empty() && !s.composing);
        assert!(matches!(
            view.drain_requests().as_slice(),
            [Request::LoadComments { generation: 2, task_id: 1 }]
        ));
    }

    #[test]
    fn task_list_for_another_project_is_ignored() {
        let mut view = TaskListView::new(project());
        load(&mut view, &[1]);
        view.reload();
        view.drain_requests();
        view.handle_response(Response::TasksLoaded {
            project_id: 2,
            generation: 99,
            result: Ok(TaskPage {
                tasks: vec![task(5)],
                completed_tag: None,
            }),
        });
        let ids: Vec<TaskId> = view.set.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(view.set.loading);
    }

    #[test]
    fn failed_comment_load_stops_loading() {
        let mut view = TaskListView::new(project());
        load(&mut view, &[1, 2]);
        view.open_detail(1);
        view.drain_requests();
        let err = || Err(crate::store::StoreError::NotFound { entity: "task", id: 1 });

        view.handle_response(Response::CommentsLoaded {
            generation: 1,
            task_id: 2,
            result: err(),
        });
        assert!(view.status.is_none());

        view.handle_response(Response::CommentsLoaded {
            generation: 1,
            task_id: 1,
            result: err(),
        });
        let Mode::Viewing(session) = &view.mode else {
            panic!("left detail view");
        };
        assert!(!session.loading);
        assert!(view.status.as_deref().unwrap().contains("loading comments failed"));
    }
}

use crate::model::{ProjectId, Tag, TagId, Task, TaskId, find_tag};
use crate::tui::scroll::ScrollState;
use crate::tui::text::TextBuffer;
use crate::tui::worker::{Generation, Request, TaskPage, TaskQuery};

/// The cached task list behind the screen and the filters that produced it
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub project_id: ProjectId,
    pub tasks: Vec<Task>,
    pub tags: Vec<Tag>,
    pub search: TextBuffer,
    pub tag_filter: Option<TagId>,
    pub showing_completed: bool,
    /// Filter to restore when leaving the completed view
    stashed_filter: Option<TagId>,
    completed_tag: Option<TagId>,
    pub scroll: ScrollState,
    latest: Generation,
    pub loading: bool,
}

impl WorkingSet {
    pub fn new(project_id: ProjectId) -> Self {
        WorkingSet {
            project_id,
            tasks: Vec::new(),
            tags: Vec::new(),
            search: TextBuffer::single_line(),
            tag_filter: None,
            showing_completed: false,
            stashed_filter: None,
            completed_tag: None,
            scroll: ScrollState::default(),
            latest: 0,
            loading: false,
        }
    }

    pub fn query(&self) -> TaskQuery {
        TaskQuery {
            project_id: self.project_id,
            search: self.search.text().trim().to_string(),
            tag_id: self.tag_filter,
            showing_completed: self.showing_completed,
        }
    }

    /// Build the next load request, superseding any load still in flight
    pub fn next_load(&mut self) -> Request {
        self.latest += 1;
        self.loading = true;
        Request::LoadTasks {
            generation: self.latest,
            query: self.query(),
        }
    }

    /// Newest load stamp handed out so far
    pub fn generation(&self) -> Generation {
        self.latest
    }

    /// Continue numbering after `floor` so loads issued by an earlier view
    /// can never pass for this one's
    pub fn resume_after(&mut self, floor: Generation) {
        self.latest = self.latest.max(floor);
    }

    pub fn is_stale(&self, generation: Generation) -> bool {
        generation < self.latest
    }

    /// Take a loaded page. Returns false if a newer load was issued since.
    pub fn accept(&mut self, generation: Generation, page: TaskPage) -> bool {
        if self.is_stale(generation) {
            tracing::trace!(generation, latest = self.latest, "dropping stale task list");
            return false;
        }
        self.tasks = page.tasks;
        if page.completed_tag.is_some() {
            self.completed_tag = page.completed_tag;
        }
        self.scroll.set_len(self.tasks.len());
        self.loading = false;
        true
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        if let Some(complete) = tags.iter().find(|t| t.is_complete_tag()) {
            self.completed_tag = Some(complete.id);
        }
        self.tags = tags;
    }

    pub fn completed_tag(&self) -> Option<TagId> {
        self.completed_tag
    }

    /// Swap between the default list and the completed view. The filter in
    /// force before entering the completed view comes back on leaving it.
    pub fn toggle_completed(&mut self) {
        if self.showing_completed {
            self.tag_filter = self.stashed_filter.take();
            self.showing_completed = false;
        } else {
            self.stashed_filter = self.tag_filter;
            self.tag_filter = self.completed_tag;
            self.showing_completed = true;
        }
        self.scroll.reset();
    }

    /// Pick a filter from the dropdown. This also leaves the completed view.
    pub fn set_filter(&mut self, tag_id: Option<TagId>) {
        self.tag_filter = tag_id;
        self.showing_completed = false;
        self.stashed_filter = None;
        self.scroll.reset();
    }

    pub fn selected(&self) -> Option<&Task> {
        self.tasks.get(self.scroll.cursor())
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.task(id).is_some()
    }

    /// Dropdown rows are "None" followed by every tag
    pub fn dropdown_len(&self) -> usize {
        self.tags.len() + 1
    }

    /// Dropdown row showing the current filter
    pub fn dropdown_index(&self) -> usize {
        self.tag_filter
            .and_then(|id| self.tags.iter().position(|t| t.id == id))
            .map_or(0, |i| i + 1)
    }

    pub fn dropdown_choice(&self, index: usize) -> Option<TagId> {
        index.checked_sub(1).and_then(|i| self.tags.get(i)).map(|t| t.id)
    }

    pub fn filter_label(&self) -> String {
        if self.showing_completed {
            return "completed".to_string();
        }
        match self.tag_filter {
            Some(id) => find_tag(&self.tags, id).map_or_else(|| "?".to_string(), |t| t.name.clone()),
            None => "All".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn tag(id: TagId, name: &str) -> Tag {
        Tag {
            id,
            name: name.into(),
            color: "#ffffff".into(),
            group_id: None,
            created_at: Utc::now(),
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

    fn page(ids: &[TaskId]) -> TaskPage {
        TaskPage {
            tasks: ids.iter().copied().map(task).collect(),
            completed_tag: Some(4),
        }
    }

    fn generation_of(request: Request) -> Generation {
        match request {
            Request::LoadTasks { generation, .. } => generation,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn toggling_completed_twice_restores_filter() {
        for filter in [None, Some(2)] {
            let mut set = WorkingSet::new(1);
            set.set_tags(vec![tag(2, "todo"), tag(4, "complete")]);
            set.tag_filter = filter;

            set.toggle_completed();
            assert!(set.showing_completed);
            assert_eq!(set.tag_filter, Some(4));
            assert_eq!(set.filter_label(), "completed");

            set.toggle_completed();
            assert!(!set.showing_completed);
            assert_eq!(set.tag_filter, filter);
        }
    }

    #[test]
    fn toggle_resets_cursor() {
        let mut set = WorkingSet::new(1);
        set.scroll.set_visible(10);
        let g = generation_of(set.next_load());
        set.accept(g, page(&[1, 2, 3]));
        set.scroll.last();
        set.toggle_completed();
        assert_eq!((set.scroll.cursor(), set.scroll.offset()), (0, 0));
    }

    #[test]
    fn stale_loads_are_dropped() {
        let mut set = WorkingSet::new(1);
        let old = generation_of(set.next_load());
        let new = generation_of(set.next_load());
        assert!(set.accept(new, page(&[1, 2])));
        assert!(!set.accept(old, page(&[9])));
        assert_eq!(set.tasks.len(), 2);
        assert!(!set.loading);
    }

    #[test]
    fn reload_clamps_cursor() {
        let mut set = WorkingSet::new(1);
        set.scroll.set_visible(2);
        let g = generation_of(set.next_load());
        set.accept(g, page(&[1, 2, 3, 4, 5]));
        set.scroll.last();
        let g = generation_of(set.next_load());
        set.accept(g, page(&[1, 2]));
        assert_eq!(set.scroll.cursor(), 1);
        assert_eq!(set.selected().map(|t| t.id), Some(2));
    }

    #[test]
    fn query_trims_search() {
        let mut set = WorkingSet::new(7);
        set.search.set_text("  login ");
        let q = set.query();
        assert_eq!(q.search, "login");
        assert_eq!(q.project_id, 7);
    }

    #[test]
    fn dropdown_rows() {
        let mut set = WorkingSet::new(1);
        set.set_tags(vec![tag(2, "todo"), tag(5, "bug")]);
        assert_eq!(set.dropdown_len(), 3);
        assert_eq!(set.dropdown_index(), 0);
        assert_eq!(set.dropdown_choice(0), None);
        assert_eq!(set.dropdown_choice(2), Some(5));
        set.set_filter(Some(5));
        assert_eq!(set.dropdown_index(), 2);
        assert_eq!(set.filter_label(), "bug");
    }

    #[test]
    fn choosing_filter_leaves_completed_view() {
        let mut set = WorkingSet::new(1);
        set.set_tags(vec![tag(2, "todo"), tag(4, "complete")]);
        set.toggle_completed();
        set.set_filter(Some(2));
        assert!(!set.showing_completed);
        set.toggle_completed();
        set.toggle_completed();
        assert_eq!(set.tag_filter, Some(2));
    }
}

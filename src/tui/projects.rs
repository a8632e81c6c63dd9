use crossterm::event::KeyEvent;

use super::Transition;
use super::scroll::{ScrollState, visible_items};
use super::text::TextBuffer;
use super::worker::{Request, Response};
use crate::model::{Project, ProjectId};

/// Rows outside the list: header, list borders, status line
pub const CHROME_ROWS: u16 = 4;
pub const ROWS_PER_ITEM: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
}

/// Create/edit form for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    /// None when creating
    pub project_id: Option<ProjectId>,
    pub title: TextBuffer,
    pub description: TextBuffer,
    pub field: FormField,
}

impl ProjectForm {
    pub fn create() -> Self {
        ProjectForm {
            project_id: None,
            title: TextBuffer::single_line(),
            description: TextBuffer::single_line(),
            field: FormField::Title,
        }
    }

    pub fn edit(project: &Project) -> Self {
        ProjectForm {
            project_id: Some(project.id),
            title: TextBuffer::single_line().with_text(&project.title),
            description: TextBuffer::single_line().with_text(&project.description),
            field: FormField::Title,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    pub fn focused_buffer(&mut self) -> &mut TextBuffer {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectMode {
    Browse,
    Form(ProjectForm),
    ConfirmDelete { project_id: ProjectId, title: String },
    Help,
}

pub struct ProjectListView {
    pub projects: Vec<Project>,
    pub scroll: ScrollState,
    pub mode: ProjectMode,
    pub status: Option<String>,
    pub loading: bool,
    outbox: Vec<Request>,
}

impl Default for ProjectListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectListView {
    pub fn new() -> Self {
        ProjectListView {
            projects: Vec::new(),
            scroll: ScrollState::default(),
            mode: ProjectMode::Browse,
            status: None,
            loading: false,
            outbox: Vec::new(),
        }
    }

    pub fn refresh(&mut self) {
        self.loading = true;
        self.request(Request::LoadProjects);
    }

    pub fn request(&mut self, request: Request) {
        self.outbox.push(request);
    }

    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn resize(&mut self, _width: u16, height: u16) {
        let rows = height.saturating_sub(CHROME_ROWS);
        self.scroll.set_visible(visible_items(rows, ROWS_PER_ITEM));
    }

    pub fn selected(&self) -> Option<&Project> {
        self.projects.get(self.scroll.cursor())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Transition {
        super::input::handle_project_key(self, key)
    }

    /// Validate and send the open form. A blank title keeps the form open.
    pub fn submit_form(&mut self) {
        let ProjectMode::Form(form) = &self.mode else {
            return;
        };
        let title = form.title.text().trim().to_string();
        if title.is_empty() {
            self.status = Some("project name is required".to_string());
            return;
        }
        let description = form.description.text().trim().to_string();
        let request = match form.project_id {
            Some(id) => Request::UpdateProject {
                id,
                title,
                description,
            },
            None => Request::CreateProject { title, description },
        };
        self.mode = ProjectMode::Browse;
        self.request(request);
    }

    fn fail(&mut self, what: &str, err: &dyn std::fmt::Display) {
        tracing::warn!(error = %err, "{what} failed");
        self.status = Some(format!("{what} failed: {err}"));
    }

    /// Apply a worker result. Creating a project opens it.
    pub fn handle_response(&mut self, response: Response) -> Transition {
        match response {
            Response::ProjectsLoaded(Ok(projects)) => {
                self.projects = projects;
                self.scroll.set_len(self.projects.len());
                self.loading = false;
            }
            Response::ProjectsLoaded(Err(e)) => {
                self.loading = false;
                self.fail("loading projects", &e);
            }
            Response::ProjectCreated(Ok(project)) => {
                tracing::info!(id = project.id, "project created");
                self.refresh();
                return Transition::OpenProject(project);
            }
            Response::ProjectCreated(Err(e)) => self.fail("creating project", &e),
            Response::ProjectUpdated(Ok(())) | Response::ProjectDeleted(Ok(())) => self.refresh(),
            Response::ProjectUpdated(Err(e)) => self.fail("updating project", &e),
            Response::ProjectDeleted(Err(e)) => self.fail("deleting project", &e),
            other => tracing::trace!(?other, "project list ignoring response"),
        }
        Transition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(id: ProjectId, title: &str) -> Project {
        Project {
            id,
            title: title.into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn blank_name_keeps_form_open() {
        let mut view = ProjectListView::new();
        view.mode = ProjectMode::Form(ProjectForm::create());
        view.submit_form();
        assert!(matches!(view.mode, ProjectMode::Form(_)));
        assert!(view.status.is_some());
        assert!(view.drain_requests().is_empty());
    }

    #[test]
    fn edit_form_sends_update() {
        let mut view = ProjectListView::new();
        let p = project(4, "Old");
        let mut form = ProjectForm::edit(&p);
        form.title.set_text(" New ");
        view.mode = ProjectMode::Form(form);
        view.submit_form();
        assert_eq!(view.mode, ProjectMode::Browse);
        assert_eq!(
            view.drain_requests(),
            vec![Request::UpdateProject {
                id: 4,
                title: "New".into(),
                description: String::new()
            }]
        );
    }

    #[test]
    fn created_project_opens() {
        let mut view = ProjectListView::new();
        let t = view.handle_response(Response::ProjectCreated(Ok(project(9, "Fresh"))));
        assert!(matches!(t, Transition::OpenProject(p) if p.id == 9));
        assert_eq!(view.drain_requests(), vec![Request::LoadProjects]);
    }

    #[test]
    fn loaded_list_clamps_cursor() {
        let mut view = ProjectListView::new();
        view.resize(80, 24);
        view.handle_response(Response::ProjectsLoaded(Ok(vec![
            project(1, "A"),
            project(2, "B"),
            project(3, "C"),
        ])));
        view.scroll.last();
        view.handle_response(Response::ProjectsLoaded(Ok(vec![project(1, "A")])));
        assert_eq!(view.selected().map(|p| p.id), Some(1));
    }
}

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::model::Project;
use crate::store::Store;

use super::Transition;
use super::projects::ProjectListView;
use super::render;
use super::tasks::TaskListView;
use super::theme::Theme;
use super::worker::{Generation, Request, Response, Worker};

/// Main application state: the project list, the open project's task list
/// (if any), and the handle to the store worker.
pub struct App {
    pub projects: ProjectListView,
    pub tasks: Option<TaskListView>,
    pub theme: Theme,
    pub should_quit: bool,
    size: (u16, u16),
    worker: Worker,
    /// Last load stamp of any task view closed so far
    generation_floor: Generation,
}

impl App {
    /// Build the app and queue the startup loads: the project list and the
    /// last opened project, which is reopened if it still exists.
    pub fn new(worker: Worker, theme: Theme, width: u16, height: u16) -> Self {
        let mut projects = ProjectListView::new();
        projects.resize(width, height);
        projects.refresh();
        projects.request(Request::LoadLastProject);

        let mut app = App {
            projects,
            tasks: None,
            theme,
            should_quit: false,
            size: (width, height),
            worker,
            generation_floor: 0,
        };
        app.flush();
        app
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let transition = match &mut self.tasks {
            Some(view) => view.handle_key(key),
            None => self.projects.handle_key(key),
        };
        self.apply(transition);
        self.flush();
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.projects.resize(width, height);
        if let Some(view) = &mut self.tasks {
            view.resize(width, height);
        }
    }

    pub fn handle_response(&mut self, response: Response) {
        match response {
            Response::LastProject(Ok(Some(project))) => {
                if self.tasks.is_none() {
                    tracing::info!(id = project.id, "reopening last project");
                    self.open_project(project);
                }
            }
            Response::LastProject(Ok(None)) => {}
            Response::LastProject(Err(e)) => {
                tracing::warn!(error = %e, "could not read last project");
            }
            Response::SettingSaved(result) => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "could not save last project");
                }
            }
            response @ (Response::ProjectsLoaded(_)
            | Response::ProjectCreated(_)
            | Response::ProjectUpdated(_)
            | Response::ProjectDeleted(_)) => {
                let transition = self.projects.handle_response(response);
                self.apply(transition);
            }
            response => match &mut self.tasks {
                Some(view) => view.handle_response(response),
                None => tracing::trace!(?response, "no task view; dropping response"),
            },
        }
        self.flush();
    }

    /// Handle every response that has already arrived
    pub fn pump(&mut self) -> bool {
        let mut any = false;
        while let Some(response) = self.worker.try_recv() {
            self.handle_response(response);
            any = true;
        }
        any
    }

    /// Block until the worker has answered everything sent so far, including
    /// follow-up requests the answers trigger.
    pub fn settle(&mut self, timeout: Duration) {
        while self.worker.in_flight() > 0 {
            match self.worker.recv_timeout(timeout) {
                Some(response) => self.handle_response(response),
                None => break,
            }
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Quit => self.should_quit = true,
            Transition::BackToProjects => {
                self.close_project();
                self.projects.request(Request::SetLastProject(None));
                self.projects.refresh();
            }
            Transition::OpenProject(project) => self.open_project(project),
        }
    }

    fn open_project(&mut self, project: Project) {
        tracing::debug!(id = project.id, title = %project.title, "opening project");
        self.projects.request(Request::SetLastProject(Some(project.id)));
        self.close_project();
        let mut view = TaskListView::new(project);
        view.resume_after(self.generation_floor);
        view.resize(self.size.0, self.size.1);
        view.start();
        self.tasks = Some(view);
    }

    /// Drop the task view, remembering how far its loads were numbered
    fn close_project(&mut self) {
        if let Some(view) = self.tasks.take() {
            self.generation_floor = self.generation_floor.max(view.generation());
        }
    }

    /// Forward queued requests to the worker
    fn flush(&mut self) {
        for request in self.projects.drain_requests() {
            self.worker.send(request);
        }
        if let Some(view) = &mut self.tasks {
            for request in view.drain_requests() {
                self.worker.send(request);
            }
        }
    }
}

/// Run the TUI on the given store until the user quits
pub fn run(store: Store, theme: Theme) -> Result<(), Box<dyn std::error::Error>> {
    let worker = Worker::spawn(store)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let size = terminal.size()?;
    let mut app = App::new(worker, theme, size.width, size.height);
    tracing::info!(width = size.width, height = size.height, "tui started");

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(width, height) => app.handle_resize(width, height),
                _ => {}
            }
        }
        app.pump();

        if app.should_quit {
            break;
        }
    }
    tracing::info!("tui exiting");
    Ok(())
}

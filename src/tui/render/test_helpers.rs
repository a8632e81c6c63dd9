use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{Project, Tag, TagGroupId, TagId, Task, TaskId};
use crate::tui::tasks::{ROWS_PER_ITEM, TaskListView};
use crate::tui::worker::{Request, Response, TaskPage};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn project(id: i64, title: &str) -> Project {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    Project {
        id,
        title: title.into(),
        description: String::new(),
        created_at: at,
        updated_at: at,
    }
}

pub fn tag(id: TagId, name: &str, group_id: Option<TagGroupId>) -> Tag {
    Tag {
        id,
        name: name.into(),
        color: "#7aa2f7".into(),
        group_id,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn task(id: TaskId, title: &str, priority: u8) -> Task {
    let at = Utc.with_ymd_and_hms(2025, 3, 2, 14, 5, 0).unwrap();
    Task {
        id,
        project_id: 1,
        title: title.into(),
        description: String::new(),
        notes: String::new(),
        priority,
        created_at: at,
        updated_at: at,
        tags: Vec::new(),
    }
}

/// The seeded Status tags, ids 1..=4 in group 1
pub fn status_tags() -> Vec<Tag> {
    vec![
        tag(3, "active", Some(1)),
        tag(4, "complete", Some(1)),
        tag(1, "design", Some(1)),
        tag(2, "todo", Some(1)),
    ]
}

/// A started task view for project 1 holding `tasks`, sized for the test terminal
pub fn view_with(tasks: Vec<Task>) -> TaskListView {
    let mut view = TaskListView::new(project(1, "Demo"));
    view.resize(TERM_W, TERM_H);
    view.start();
    load_page(&mut view, tasks);
    view.handle_response(Response::TagsLoaded(Ok(status_tags())));
    view
}

/// Answer the newest queued task load with `tasks`
pub fn load_page(view: &mut TaskListView, tasks: Vec<Task>) {
    let generation = view
        .drain_requests()
        .into_iter()
        .filter_map(|r| match r {
            Request::LoadTasks { generation, .. } => Some(generation),
            _ => None,
        })
        .last()
        .expect("no task load queued");
    view.handle_response(Response::TasksLoaded {
        project_id: view.project.id,
        generation,
        result: Ok(TaskPage {
            tasks,
            completed_tag: Some(4),
        }),
    });
}

#[test]
fn view_with_fits_five_tasks() {
    let view = view_with((1..=8).map(|i| task(i, "t", 0)).collect());
    assert_eq!(
        view.set.scroll.visible() as u16,
        (TERM_H - crate::tui::tasks::CHROME_ROWS) / ROWS_PER_ITEM
    );
}

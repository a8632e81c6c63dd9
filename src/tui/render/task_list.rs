use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use regex::Regex;

use crate::model::Task;
use crate::tui::tasks::{Focus, Mode, TaskListView};
use crate::tui::theme::Theme;

use super::{
    edit_form, help_overlay, popups, push_highlighted_spans, render_status_line, search_regex,
    task_detail, truncate_to_width, with_cursor,
};

/// Render the whole task screen: header, filter bar, list or detail, status
/// line, then whatever popup the mode calls for.
pub fn render_task_screen(frame: &mut Frame, view: &TaskListView, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // back / search / filter
            Constraint::Min(0),    // list or detail
            Constraint::Length(1), // status line
        ])
        .split(area);

    render_header(frame, view, theme, chunks[0]);
    render_filter_bar(frame, view, theme, chunks[1]);

    let detail = match &view.mode {
        Mode::Viewing(session) => Some(session),
        Mode::Help { prior } => match prior.as_ref() {
            Mode::Viewing(session) => Some(session),
            _ => None,
        },
        _ => None,
    };
    match detail {
        Some(session) => task_detail::render_task_detail(
            frame,
            view.set.task(session.task_id),
            session,
            theme,
            chunks[2],
        ),
        None => render_list(frame, view, theme, chunks[2]),
    }

    render_status_line(
        frame,
        view.status.as_deref(),
        hints(view),
        theme,
        chunks[3],
    );

    match &view.mode {
        Mode::TagDropdown { cursor } => {
            popups::render_tag_dropdown(frame, &view.set.tags, *cursor, theme, chunks[1], area)
        }
        Mode::Editing(session) => {
            edit_form::render_edit_form(frame, session, &view.set.tags, theme, area)
        }
        Mode::AssigningTags { task_id, cursor } => popups::render_assign_tags(
            frame,
            view.set.task(*task_id),
            &view.set.tags,
            *cursor,
            theme,
            area,
        ),
        Mode::ConfirmingDelete { title, .. } => {
            popups::render_confirm(frame, "Delete Task?", title, theme, area)
        }
        Mode::Help { prior } => help_overlay::render_task_help(frame, prior, theme, area),
        Mode::Normal | Mode::Viewing(_) => {}
    }
}

fn hints(view: &TaskListView) -> &'static str {
    match &view.mode {
        Mode::Normal if view.focus == Focus::Search => "type to search  Enter/Esc done  Tab next",
        Mode::Normal => {
            "n new  e edit  d delete  t tags  c done  / search  f filter  ? help  q quit"
        }
        Mode::TagDropdown { .. } => "\u{2191}\u{2193} choose  Enter apply  Esc close",
        Mode::Editing(_) => "Tab next field  Enter advance/toggle  Ctrl+S save  Esc cancel",
        Mode::Viewing(session) if session.composing => "Ctrl+S send  Esc stop typing",
        Mode::Viewing(_) => "e edit  d delete  t tags  c comment  ? help  Esc back",
        Mode::AssigningTags { .. } => "\u{2191}\u{2193} move  Space/Enter toggle  Esc close",
        Mode::ConfirmingDelete { .. } => "y delete  n cancel",
        Mode::Help { .. } => "any key closes help",
    }
}

fn render_header(frame: &mut Frame, view: &TaskListView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let count = if view.set.loading && view.set.tasks.is_empty() {
        "loading\u{2026}".to_string()
    } else if view.set.tasks.len() == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", view.set.tasks.len())
    };
    let line = Line::from(vec![
        Span::styled(
            " stm ",
            Style::default()
                .fg(theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("\u{203A} ", Style::default().fg(theme.dim).bg(bg)),
        Span::styled(
            truncate_to_width(&view.project.title, area.width.saturating_sub(20) as usize),
            Style::default().fg(theme.text_bright).bg(bg),
        ),
        Span::styled(format!("  {count}"), Style::default().fg(theme.dim).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

fn boxed<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused { theme.highlight } else { theme.dim };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border).bg(theme.background))
        .style(Style::default().bg(theme.background))
}

fn render_filter_bar(frame: &mut Frame, view: &TaskListView, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(10),
            Constraint::Length(24),
        ])
        .split(area);
    let normal = view.mode == Mode::Normal;
    let focused = |f: Focus| normal && view.focus == f;
    let text = Style::default().fg(theme.text).bg(theme.background);
    let dim = Style::default().fg(theme.dim).bg(theme.background);

    frame.render_widget(
        Paragraph::new(Span::styled("\u{25C2} Back", text)).block(boxed("", focused(Focus::Back), theme)),
        chunks[0],
    );

    let search = if focused(Focus::Search) {
        Span::styled(with_cursor(&view.set.search), text)
    } else if view.set.search.is_empty() {
        Span::styled("/ to search", dim)
    } else {
        Span::styled(view.set.search.text().to_string(), text)
    };
    frame.render_widget(
        Paragraph::new(search).block(boxed(" Search ", focused(Focus::Search), theme)),
        chunks[1],
    );

    let label = view.set.filter_label();
    let filter_style = if view.set.showing_completed {
        Style::default().fg(theme.green).bg(theme.background)
    } else {
        text
    };
    let filter_focused = focused(Focus::TagFilter) || matches!(view.mode, Mode::TagDropdown { .. });
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{label} \u{25BE}"), filter_style))
            .block(boxed(" Filter ", filter_focused, theme)),
        chunks[2],
    );
}

fn render_list(frame: &mut Frame, view: &TaskListView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let title = if view.set.showing_completed {
        " Completed "
    } else {
        " Tasks "
    };
    let block = boxed(title, view.mode == Mode::Normal && view.focus == Focus::List, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.set.tasks.is_empty() {
        let message = if view.set.loading {
            "Loading\u{2026}"
        } else if view.set.search.is_empty() && view.set.tag_filter.is_none() {
            "No tasks. Press n to create one."
        } else {
            "No tasks match."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {message}"), Style::default().fg(theme.dim).bg(bg))),
            inner,
        );
        return;
    }

    let search_re = search_regex(view.set.search.text());
    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for index in view.set.scroll.window() {
        let task = &view.set.tasks[index];
        let selected = index == view.set.scroll.cursor();
        lines.extend(task_lines(task, selected, search_re.as_ref(), width, theme));
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

/// The three rows of one list entry
fn task_lines<'a>(
    task: &Task,
    selected: bool,
    search_re: Option<&Regex>,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().fg(theme.text).bg(bg);
    let bright = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(theme.dim).bg(bg);
    let hl = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let priority_color = match task.priority {
        7.. => theme.red,
        4..=6 => theme.yellow,
        _ => theme.dim,
    };

    let marker = if selected { "\u{258C} " } else { "  " };
    let mut first = vec![
        Span::styled(marker, Style::default().fg(theme.selection_border).bg(bg)),
        Span::styled(format!("P{:<2} ", task.priority), Style::default().fg(priority_color).bg(bg)),
    ];
    let title = truncate_to_width(&task.title, width.saturating_sub(6));
    push_highlighted_spans(&mut first, &title, if selected { bright } else { base }, hl, search_re);

    let mut second = vec![Span::styled("      ", dim)];
    for tag in &task.tags {
        second.push(Span::styled(
            format!("#{} ", tag.name),
            Style::default().fg(theme.tag_color(&tag.color)).bg(bg),
        ));
    }
    if let Some(desc) = task.description.lines().next().filter(|l| !l.trim().is_empty()) {
        let used: usize = second.iter().map(|s| s.width()).sum();
        let desc = truncate_to_width(desc, width.saturating_sub(used));
        push_highlighted_spans(&mut second, &desc, dim, hl, search_re);
    }

    vec![
        Line::from(first).style(Style::default().bg(bg)),
        Line::from(second).style(Style::default().bg(bg)),
        Line::from(""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn draw(view: &TaskListView) -> String {
        let theme = Theme::default();
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_screen(frame, view, &theme, area)
        })
    }

    #[test]
    fn lists_tasks_in_order_with_header() {
        let mut a = task(1, "Write parser", 3);
        a.tags = vec![tag(2, "todo", Some(1))];
        let view = view_with(vec![task(2, "Ship release", 7), a]);
        let out = draw(&view);
        assert!(out.contains("stm \u{203A} Demo  2 tasks"));
        let ship = out.find("Ship release").unwrap();
        let parser = out.find("Write parser").unwrap();
        assert!(ship < parser);
        assert!(out.contains("P7"));
        assert!(out.contains("#todo"));
        assert!(out.contains("All \u{25BE}"));
    }

    #[test]
    fn empty_list_invites_creation() {
        let view = view_with(vec![]);
        let out = draw(&view);
        assert!(out.contains("No tasks. Press n to create one."));
        assert!(out.contains("0 tasks"));
    }

    #[test]
    fn only_window_rows_are_drawn() {
        let tasks = (1..=9).map(|i| task(i, &format!("Task number {i}"), 0)).collect();
        let mut view = view_with(tasks);
        for _ in 0..7 {
            view.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        let out = draw(&view);
        assert!(!out.contains("Task number 1"));
        assert!(!out.contains("Task number 3"));
        assert!(out.contains("Task number 4"));
        assert!(out.contains("Task number 8"));
        assert!(!out.contains("Task number 9"));
    }

    #[test]
    fn completed_view_is_labelled() {
        let mut view = view_with(vec![]);
        view.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        let out = draw(&view);
        assert!(out.contains("Completed"));
        assert!(out.contains("completed \u{25BE}"));
    }

    #[test]
    fn status_message_replaces_hints() {
        let mut view = view_with(vec![]);
        view.status = Some("saving task failed: boom".into());
        let out = draw(&view);
        assert!(out.contains("saving task failed: boom"));
        assert!(!out.contains("n new"));
    }

    #[test]
    fn search_box_shows_cursor_when_focused() {
        let mut view = view_with(vec![task(1, "alpha", 0)]);
        view.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        view.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        let out = draw(&view);
        assert!(out.contains("a\u{258C}"));
        assert!(out.contains("type to search"));
    }
}

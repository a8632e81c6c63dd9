use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::projects::{FormField, ProjectForm, ProjectListView, ProjectMode};
use crate::tui::theme::Theme;

use super::{help_overlay, popups, render_status_line, truncate_to_width, with_cursor};

/// Render the project picker with any open form or prompt over it
pub fn render_project_screen(
    frame: &mut Frame,
    view: &ProjectListView,
    theme: &Theme,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let bg = theme.background;

    let header = Line::from(vec![
        Span::styled(
            " stm ",
            Style::default()
                .fg(theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("\u{203A} Projects", Style::default().fg(theme.text_bright).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(header).style(Style::default().bg(bg)), chunks[0]);

    render_list(frame, view, theme, chunks[1]);

    let hints = match view.mode {
        ProjectMode::Browse => "Enter open  n new  e edit  d delete  ? help  q quit",
        ProjectMode::Form(_) => "Tab switch field  Enter next/save  Ctrl+S save  Esc cancel",
        ProjectMode::ConfirmDelete { .. } => "y delete  n cancel",
        ProjectMode::Help => "any key closes help",
    };
    render_status_line(frame, view.status.as_deref(), hints, theme, chunks[2]);

    match &view.mode {
        ProjectMode::Form(form) => render_form(frame, form, theme, area),
        ProjectMode::ConfirmDelete { title, .. } => {
            popups::render_confirm(frame, "Delete Project?", title, theme, area)
        }
        ProjectMode::Help => help_overlay::render_project_help(frame, theme, area),
        ProjectMode::Browse => {}
    }
}

fn render_list(frame: &mut Frame, view: &ProjectListView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Projects ")
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(theme.dim).bg(bg);
    if view.projects.is_empty() {
        let message = if view.loading {
            " Loading\u{2026}"
        } else {
            " No projects. Press n to create one."
        };
        frame.render_widget(Paragraph::new(Span::styled(message, dim)), inner);
        return;
    }

    let width = inner.width.saturating_sub(3) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for index in view.scroll.window() {
        let project = &view.projects[index];
        let selected = index == view.scroll.cursor();
        let row_bg = if selected { theme.selection_bg } else { bg };
        let title_style = if selected {
            Style::default()
                .fg(theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(row_bg)
        };
        let marker = if selected { " \u{258C} " } else { "   " };
        lines.push(
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.selection_border).bg(row_bg)),
                Span::styled(truncate_to_width(&project.title, width), title_style),
            ])
            .style(Style::default().bg(row_bg)),
        );
        let description = project.description.lines().next().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled("   ", dim),
            Span::styled(truncate_to_width(description, width), dim),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn render_form(frame: &mut Frame, form: &ProjectForm, theme: &Theme, area: Rect) {
    let width = 60.min(area.width);
    let height = 8.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let bg = theme.background;
    let label = |field: FormField| {
        let style = if form.field == field {
            Style::default()
                .fg(theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        let name = match field {
            FormField::Title => " Name",
            FormField::Description => " Description",
        };
        Line::from(Span::styled(name, style))
    };
    let value = |field: FormField| {
        let buf = match field {
            FormField::Title => &form.title,
            FormField::Description => &form.description,
        };
        let shown = if form.field == field {
            with_cursor(buf)
        } else {
            buf.text().to_string()
        };
        Line::from(Span::styled(
            format!("   {shown}"),
            Style::default().fg(theme.text).bg(bg),
        ))
    };
    let lines = vec![
        label(FormField::Title),
        value(FormField::Title),
        Line::from(""),
        label(FormField::Description),
        value(FormField::Description),
    ];

    let title = if form.project_id.is_some() {
        " Edit Project "
    } else {
        " New Project "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

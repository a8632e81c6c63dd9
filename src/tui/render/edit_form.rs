use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Tag;
use crate::tui::tasks::{EditField, EditSession};
use crate::tui::text::TextBuffer;
use crate::tui::theme::Theme;

use super::{centered_rect, with_cursor};

/// Render the task create/edit popup
pub fn render_edit_form(
    frame: &mut Frame,
    session: &EditSession,
    tags: &[Tag],
    theme: &Theme,
    area: Rect,
) {
    let popup = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup);

    let bg = theme.background;
    let label_style = Style::default().fg(theme.dim).bg(bg);
    let active_label = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(theme.text).bg(bg);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (field, buf) in [
        (EditField::Title, &session.title),
        (EditField::Description, &session.description),
        (EditField::Notes, &session.notes),
        (EditField::Priority, &session.priority),
    ] {
        let focused = session.field == field;
        let style = if focused { active_label } else { label_style };
        lines.push(Line::from(Span::styled(format!(" {}", field.label()), style)));
        let shown = if focused {
            with_cursor(buf)
        } else {
            buf.text().to_string()
        };
        if shown.is_empty() {
            lines.push(Line::from(""));
        }
        for l in shown.lines() {
            lines.push(Line::from(Span::styled(format!("   {l}"), text)));
        }
        lines.push(Line::from(""));
    }

    let tags_focused = session.field == EditField::Tags;
    lines.push(Line::from(Span::styled(
        " Tags",
        if tags_focused { active_label } else { label_style },
    )));
    if tags.is_empty() {
        lines.push(Line::from(Span::styled("   (no tags)", label_style)));
    }
    for (i, tag) in tags.iter().enumerate() {
        let checked = if session.tags.contains(&tag.id) { "[x]" } else { "[ ]" };
        let under_cursor = tags_focused && i == session.tag_cursor;
        let row_bg = if under_cursor { theme.selection_bg } else { bg };
        let marker = if under_cursor { " \u{25B8} " } else { "   " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.highlight).bg(row_bg)),
            Span::styled(
                format!("{checked} "),
                Style::default().fg(theme.text).bg(row_bg),
            ),
            Span::styled(
                tag.name.clone(),
                Style::default().fg(theme.tag_color(&tag.color)).bg(row_bg),
            ),
        ]));
    }
    lines.push(Line::from(""));

    let save_style = if session.field == EditField::Save {
        Style::default()
            .fg(theme.background)
            .bg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.green).bg(bg)
    };
    lines.push(Line::from(vec![
        Span::styled(" ", text),
        Span::styled("[ Save ]", save_style),
    ]));

    // Keep the focused field on screen in short terminals
    let inner_height = popup.height.saturating_sub(2) as usize;
    let focus_line = focus_line(session, tags.len());
    let scroll = focus_line.saturating_sub(inner_height.saturating_sub(3)) as u16;

    let title = if session.is_new() { " New Task " } else { " Edit Task " };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), popup);
}

/// Approximate line index of the focused field's label
fn focus_line(session: &EditSession, tag_count: usize) -> usize {
    let height = |buf: &TextBuffer| buf.text().lines().count().max(1) + 2;
    let mut line = 0;
    for (field, buf) in [
        (EditField::Title, &session.title),
        (EditField::Description, &session.description),
        (EditField::Notes, &session.notes),
        (EditField::Priority, &session.priority),
    ] {
        if session.field == field {
            return line;
        }
        line += height(buf);
    }
    match session.field {
        EditField::Tags => line + 1 + session.tag_cursor,
        _ => line + 2 + tag_count.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn draw(session: &EditSession, tags: &[Tag]) -> String {
        let theme = Theme::default();
        render_to_string(TERM_W, 40, |frame, area| {
            render_edit_form(frame, session, tags, &theme, area)
        })
    }

    #[test]
    fn new_task_form_lists_fields() {
        let session = EditSession::new_task();
        let out = draw(&session, &status_tags());
        assert!(out.contains("New Task"));
        assert!(out.contains("Title"));
        assert!(out.contains("Priority"));
        assert!(out.contains("[ ] active"));
        assert!(out.contains("[ Save ]"));
        assert!(out.contains("\u{258C}"));
    }

    #[test]
    fn edit_form_checks_task_tags() {
        let mut t = task(1, "Refactor", 3);
        t.tags = vec![tag(2, "todo", Some(1))];
        let mut session = EditSession::for_task(&t);
        session.field = EditField::Tags;
        session.tag_cursor = 3;
        let out = draw(&session, &status_tags());
        assert!(out.contains("Edit Task"));
        assert!(out.contains("Refactor"));
        assert!(out.contains("\u{25B8} [x] todo"));
        assert!(out.contains("[ ] design"));
    }
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::Task;
use crate::tui::tasks::DetailSession;
use crate::tui::theme::Theme;

use super::with_cursor;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render one task with its comment thread in place of the list
pub fn render_task_detail(
    frame: &mut Frame,
    task: Option<&Task>,
    session: &DetailSession,
    theme: &Theme,
    area: Rect,
) {
    let bg = theme.background;
    let Some(task) = task else {
        let empty = Paragraph::new(" Task not found")
            .style(Style::default().fg(theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    };

    let input_height = if session.composing {
        (session.input.text().lines().count().max(1) as u16 + 2).min(6)
    } else {
        3
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(input_height)])
        .split(area);

    let text = Style::default().fg(theme.text).bg(bg);
    let dim = Style::default().fg(theme.dim).bg(bg);
    let header = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(format!(" {}", task.title), header)));
    lines.push(Line::from(Span::styled(
        format!(
            " P{}  created {}  updated {}",
            task.priority,
            task.created_at.format(DATE_FORMAT),
            task.updated_at.format(DATE_FORMAT)
        ),
        dim,
    )));
    if !task.tags.is_empty() {
        let mut spans = vec![Span::styled(" ", dim)];
        for tag in &task.tags {
            spans.push(Span::styled(
                format!("#{} ", tag.name),
                Style::default().fg(theme.tag_color(&tag.color)).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    for (label, body) in [("Description", &task.description), ("Notes", &task.notes)] {
        if body.trim().is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {label}"), header)));
        for l in body.lines() {
            lines.push(Line::from(Span::styled(format!("   {l}"), text)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Comments ({})", session.comments.len()),
        header,
    )));
    if session.loading && session.comments.is_empty() {
        lines.push(Line::from(Span::styled("   loading\u{2026}", dim)));
    } else if session.comments.is_empty() {
        lines.push(Line::from(Span::styled("   No comments yet.", dim)));
    }
    for comment in &session.comments {
        lines.push(Line::from(Span::styled(
            format!("   {}", comment.created_at.format(DATE_FORMAT)),
            Style::default().fg(theme.purple).bg(bg),
        )));
        for l in comment.content.lines() {
            lines.push(Line::from(Span::styled(format!("   {l}"), text)));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Task ")
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner_height = chunks[0].height.saturating_sub(2);
    // Keep the newest comments in view when the thread is long
    let scroll = (lines.len() as u16).saturating_sub(inner_height);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        chunks[0],
    );

    let border = if session.composing {
        theme.highlight
    } else {
        theme.dim
    };
    let input_text = if session.composing {
        Span::styled(with_cursor(&session.input), text)
    } else {
        Span::styled("c to comment", dim)
    };
    let input = Paragraph::new(Line::from(input_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Comment ")
            .border_style(Style::default().fg(border).bg(bg))
            .style(Style::default().bg(bg)),
    );
    frame.render_widget(input, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Comment;
    use crate::tui::render::test_helpers::*;
    use chrono::{TimeZone, Utc};

    fn draw(task: Option<&Task>, session: &DetailSession) -> String {
        let theme = Theme::default();
        render_to_string(TERM_W, 16, |frame, area| {
            render_task_detail(frame, task, session, &theme, area)
        })
    }

    #[test]
    fn shows_fields_and_comments() {
        let mut t = task(7, "Fix login", 5);
        t.description = "Users get logged out".into();
        t.tags = vec![tag(3, "active", Some(1))];
        let mut session = DetailSession::new(7, 1);
        session.accept(
            1,
            7,
            vec![Comment {
                id: 1,
                task_id: 7,
                content: "repro on staging".into(),
                created_at: Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap(),
            }],
        );
        let out = draw(Some(&t), &session);
        assert!(out.contains("Fix login"));
        assert!(out.contains("P5  created 2025-03-02 14:05"));
        assert!(out.contains("#active"));
        assert!(out.contains("Users get logged out"));
        assert!(out.contains("Comments (1)"));
        assert!(out.contains("2025-03-03 08:00"));
        assert!(out.contains("repro on staging"));
        assert!(!out.contains("Notes"));
    }

    #[test]
    fn composing_shows_input_cursor() {
        let t = task(1, "A", 0);
        let mut session = DetailSession::new(1, 1);
        session.composing = true;
        session.input.set_text("hi");
        let out = draw(Some(&t), &session);
        assert!(out.contains("hi\u{258C}"));
        assert!(out.contains("loading"));
    }

    #[test]
    fn missing_task_says_so() {
        let session = DetailSession::new(1, 1);
        assert!(draw(None, &session).contains("Task not found"));
    }
}

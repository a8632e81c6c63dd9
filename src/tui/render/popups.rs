use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::{Tag, Task};
use crate::tui::theme::Theme;

use super::{centered_rect, truncate_to_width};

const DROPDOWN_WIDTH: u16 = 24;

fn popup_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.highlight).bg(theme.background))
        .style(Style::default().bg(theme.background))
}

fn row_style(selected: bool, theme: &Theme) -> Style {
    if selected {
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(theme.background)
    }
}

/// Filter choices hanging under the filter box: "None" then every tag
pub fn render_tag_dropdown(
    frame: &mut Frame,
    tags: &[Tag],
    cursor: usize,
    theme: &Theme,
    anchor: Rect,
    area: Rect,
) {
    let width = DROPDOWN_WIDTH.min(area.width);
    let x = anchor.right().saturating_sub(width).max(area.x);
    let y = anchor.bottom().min(area.bottom().saturating_sub(1));
    let wanted = tags.len() as u16 + 3;
    let height = wanted.min(area.bottom().saturating_sub(y));
    let rect = Rect::new(x, y, width, height);
    frame.render_widget(Clear, rect);

    let inner_rows = height.saturating_sub(2) as usize;
    let offset = (cursor + 1).saturating_sub(inner_rows);
    let label_width = width.saturating_sub(5) as usize;

    let mut lines: Vec<Line> = Vec::new();
    let names = std::iter::once(("None".to_string(), theme.dim))
        .chain(tags.iter().map(|t| (t.name.clone(), theme.tag_color(&t.color))));
    for (i, (name, color)) in names.enumerate().skip(offset).take(inner_rows) {
        let selected = i == cursor;
        let style = row_style(selected, theme);
        lines.push(Line::from(vec![
            Span::styled(if selected { " \u{25B8} " } else { "   " }, style),
            Span::styled(truncate_to_width(&name, label_width), style.fg(color)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(popup_block(" Filter ", theme)), rect);
}

/// Checklist of tags for one task; toggles are written immediately
pub fn render_assign_tags(
    frame: &mut Frame,
    task: Option<&Task>,
    tags: &[Tag],
    cursor: usize,
    theme: &Theme,
    area: Rect,
) {
    let popup = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup);

    let dim = Style::default().fg(theme.dim).bg(theme.background);
    let mut lines: Vec<Line> = Vec::new();
    if let Some(task) = task {
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(&task.title, popup.width.saturating_sub(4) as usize)),
            Style::default().fg(theme.text_bright).bg(theme.background),
        )));
        lines.push(Line::from(""));
    }
    if tags.is_empty() {
        lines.push(Line::from(Span::styled(" No tags defined.", dim)));
    }
    let mut last_group = None;
    for (i, tag) in tags.iter().enumerate() {
        // Exclusive groups get a marker so the radio behaviour is visible
        let group_mark = match tag.group_id {
            Some(_) if last_group == Some(tag.group_id) => " \u{2502}",
            Some(_) => " \u{250C}",
            None => "  ",
        };
        last_group = Some(tag.group_id);
        let selected = i == cursor;
        let style = row_style(selected, theme);
        let checked = task.is_some_and(|t| t.has_tag(tag.id));
        lines.push(Line::from(vec![
            Span::styled(group_mark, dim),
            Span::styled(if checked { " [x] " } else { " [ ] " }, style),
            Span::styled(tag.name.clone(), style.fg(theme.tag_color(&tag.color))),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(popup_block(" Tags ", theme)), popup);
}

/// Yes/no prompt naming what is about to be deleted
pub fn render_confirm(frame: &mut Frame, title: &str, subject: &str, theme: &Theme, area: Rect) {
    let width = 50.min(area.width);
    let height = 6.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let bg = theme.background;
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(subject, width.saturating_sub(4) as usize)),
            Style::default().fg(theme.text_bright).bg(bg),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", Style::default().fg(theme.red).bg(bg).add_modifier(Modifier::BOLD)),
            Span::styled(" delete   ", Style::default().fg(theme.text).bg(bg)),
            Span::styled("n", Style::default().fg(theme.highlight).bg(bg).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(theme.text).bg(bg)),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

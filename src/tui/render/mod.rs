mod edit_form;
mod help_overlay;
mod popups;
mod project_list;
mod task_detail;
mod task_list;
#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::App;
use super::text::TextBuffer;
use super::theme::Theme;

/// Main render function, dispatches to the active screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    match &app.tasks {
        Some(view) => task_list::render_task_screen(frame, view, &app.theme, area),
        None => project_list::render_project_screen(frame, &app.projects, &app.theme, area),
    }
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

/// Case-insensitive literal matcher for the search text
pub(super) fn search_regex(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(query))).ok()
}

/// Text with a block cursor drawn at the buffer's cursor position
pub(super) fn with_cursor(buf: &TextBuffer) -> String {
    let (before, after) = buf.text().split_at(buf.cursor());
    format!("{before}\u{258C}{after}")
}

/// Cut `text` to at most `width` display columns, adding "…" when cut
pub(super) fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// Bottom line: the transient error if there is one, key hints otherwise
pub(super) fn render_status_line(
    frame: &mut Frame,
    status: Option<&str>,
    hints: &str,
    theme: &Theme,
    area: Rect,
) {
    let bg = theme.background;
    let width = area.width as usize;
    let line = match status {
        Some(message) => Line::from(Span::styled(
            truncate_to_width(&format!(" {message}"), width),
            Style::default().fg(theme.red).bg(bg),
        )),
        None => Line::from(Span::styled(
            truncate_to_width(&format!(" {hints}"), width),
            Style::default().fg(theme.dim).bg(bg),
        )),
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn texts(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn highlight_splits_on_matches() {
        let re = search_regex("log").unwrap();
        let hl = Style::default().bg(Color::Yellow);
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "Login and logout", Style::default(), hl, Some(&re));
        assert_eq!(texts(&spans), vec!["Log", "in and ", "log", "out"]);
        assert_eq!(spans[0].style, hl);
    }

    #[test]
    fn highlight_without_regex_is_one_span() {
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "plain", Style::default(), Style::default(), None);
        assert_eq!(texts(&spans), vec!["plain"]);
    }

    #[test]
    fn search_regex_is_literal() {
        let re = search_regex("a.b").unwrap();
        assert!(re.is_match("A.B"));
        assert!(!re.is_match("axb"));
        assert!(search_regex("   ").is_none());
    }

    #[test]
    fn cursor_marker_sits_at_cursor() {
        let mut buf = TextBuffer::single_line().with_text("abc");
        buf.move_left();
        assert_eq!(with_cursor(&buf), "ab\u{258C}c");
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd\u{2026}");
        assert_eq!(truncate_to_width("日本語です", 5), "日本\u{2026}");
    }
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::tasks::Mode;
use crate::tui::theme::Theme;

use super::centered_rect;

struct HelpStyles {
    key: Style,
    desc: Style,
    header: Style,
}

impl HelpStyles {
    fn new(theme: &Theme) -> Self {
        let bg = theme.background;
        HelpStyles {
            key: Style::default()
                .fg(theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
            desc: Style::default().fg(theme.text).bg(bg),
            header: Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        }
    }

    fn section(
        &self,
        lines: &mut Vec<Line<'static>>,
        title: &'static str,
        bindings: &[(&'static str, &'static str)],
    ) {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(title, self.header)));
        for &(key, desc) in bindings {
            add_binding(lines, key, desc, self.key, self.desc);
        }
    }
}

const LIST_KEYS: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move selection"),
    (" g/G", "First / last task"),
    (" Enter", "Open task details"),
    (" n", "New task"),
    (" e", "Edit task"),
    (" d", "Delete task"),
    (" t", "Assign tags"),
];

const FILTER_KEYS: &[(&str, &str)] = &[
    (" /", "Search titles and descriptions"),
    (" f", "Filter by tag"),
    (" c", "Toggle completed tasks"),
    (" Tab/S-Tab", "Move focus"),
];

const EDIT_KEYS: &[(&str, &str)] = &[
    (" Tab/S-Tab", "Next / previous field"),
    (" Enter", "Advance, newline or toggle tag"),
    (" Space", "Toggle tag"),
    (" Ctrl+S", "Save"),
    (" Esc", "Discard changes"),
];

const DETAIL_KEYS: &[(&str, &str)] = &[
    (" c", "Write a comment"),
    (" Ctrl+S", "Post comment"),
    (" e", "Edit task"),
    (" d", "Delete task"),
    (" t", "Assign tags"),
    (" Esc", "Back to list"),
];

const GLOBAL_KEYS: &[(&str, &str)] = &[
    (" ?", "Show this help"),
    (" Esc", "Back to projects"),
    (" q", "Quit"),
    (" Ctrl+C", "Quit from anywhere"),
];

const PROJECT_KEYS: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move selection"),
    (" Enter", "Open project"),
    (" n", "New project"),
    (" e", "Rename project"),
    (" d", "Delete project"),
    (" ?", "Show this help"),
    (" q", "Quit"),
];

/// Key bindings for the task screen, chosen by the mode help was opened from
pub fn render_task_help(frame: &mut Frame, prior: &Mode, theme: &Theme, area: Rect) {
    let styles = HelpStyles::new(theme);
    let mut lines: Vec<Line<'static>> = Vec::new();
    match prior {
        Mode::Viewing(_) => styles.section(&mut lines, " Task details", DETAIL_KEYS),
        Mode::Editing(_) => styles.section(&mut lines, " Editing", EDIT_KEYS),
        _ => {
            styles.section(&mut lines, " Tasks", LIST_KEYS);
            styles.section(&mut lines, " Search & filter", FILTER_KEYS);
        }
    }
    styles.section(&mut lines, " Global", GLOBAL_KEYS);
    render_overlay(frame, lines, theme, area);
}

pub fn render_project_help(frame: &mut Frame, theme: &Theme, area: Rect) {
    let styles = HelpStyles::new(theme);
    let mut lines = Vec::new();
    styles.section(&mut lines, " Projects", PROJECT_KEYS);
    render_overlay(frame, lines, theme, area);
}

fn render_overlay(frame: &mut Frame, lines: Vec<Line<'static>>, theme: &Theme, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Key Bindings ")
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn add_binding(
    lines: &mut Vec<Line<'static>>,
    key: &'static str,
    desc: &'static str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use crate::tui::tasks::DetailSession;

    #[test]
    fn list_help_shows_list_and_filter_keys() {
        let theme = Theme::default();
        let out = render_to_string(TERM_W, 40, |frame, area| {
            render_task_help(frame, &Mode::Normal, &theme, area)
        });
        assert!(out.contains("New task"));
        assert!(out.contains("Toggle completed tasks"));
        assert!(out.contains("Quit from anywhere"));
        assert!(!out.contains("Post comment"));
    }

    #[test]
    fn detail_help_is_contextual() {
        let theme = Theme::default();
        let prior = Mode::Viewing(DetailSession::new(1, 1));
        let out = render_to_string(TERM_W, 40, |frame, area| {
            render_task_help(frame, &prior, &theme, area)
        });
        assert!(out.contains("Post comment"));
        assert!(!out.contains("Filter by tag"));
    }

    #[test]
    fn keys_are_padded_to_a_column() {
        let theme = Theme::default();
        let out = render_to_string(TERM_W, 24, |frame, area| {
            render_project_help(frame, &theme, area)
        });
        let line = out.lines().find(|l| l.contains("Open project")).unwrap();
        let key_at = line.find(" Enter").unwrap();
        let desc_at = line.find("Open project").unwrap();
        assert_eq!(desc_at - key_at, 16);
    }
}

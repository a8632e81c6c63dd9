use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::tasks::{Focus, Mode, TaskListView};

use super::*;

pub(super) fn handle_navigate(view: &mut TaskListView, key: KeyEvent) -> Transition {
    if view.focus == Focus::Search {
        return handle_search(view, key);
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Transition::Quit,
        (_, KeyCode::Esc) => return Transition::BackToProjects,
        (KeyModifiers::NONE, KeyCode::Tab) => view.focus = view.focus.next(),
        (_, KeyCode::BackTab) => view.focus = view.focus.prev(),

        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) if view.focus == Focus::List => {
            view.set.scroll.up()
        }
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) if view.focus == Focus::List => {
            view.set.scroll.down()
        }
        (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) if view.focus == Focus::List => {
            view.set.scroll.first()
        }
        (KeyModifiers::NONE, KeyCode::Char('G') | KeyCode::End) if view.focus == Focus::List => {
            view.set.scroll.last()
        }

        (KeyModifiers::NONE, KeyCode::Enter) => match view.focus {
            Focus::Back => return Transition::BackToProjects,
            Focus::TagFilter => open_tag_dropdown(view),
            Focus::List => {
                if let Some(id) = view.selected().map(|t| t.id) {
                    view.open_detail(id);
                }
            }
            Focus::Search => {}
        },
        (KeyModifiers::NONE, KeyCode::Char('e')) if view.focus == Focus::List => {
            if let Some(id) = view.selected().map(|t| t.id) {
                view.start_edit(id);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) => view.start_new_task(),
        (KeyModifiers::NONE, KeyCode::Char('d')) if view.focus == Focus::List => {
            if let Some(id) = view.selected().map(|t| t.id) {
                view.confirm_delete(id);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('t')) if view.focus == Focus::List => {
            if let Some(id) = view.selected().map(|t| t.id) {
                view.assign_tags(id);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('/')) => view.focus = Focus::Search,
        (KeyModifiers::NONE, KeyCode::Char('f')) => {
            view.focus = Focus::TagFilter;
            open_tag_dropdown(view);
        }
        (KeyModifiers::NONE, KeyCode::Char('c')) => {
            view.set.toggle_completed();
            view.reload();
        }
        (KeyModifiers::NONE, KeyCode::Char('?')) => view.open_help(),
        _ => {}
    }
    Transition::Stay
}

pub(super) fn open_tag_dropdown(view: &mut TaskListView) {
    view.mode = Mode::TagDropdown {
        cursor: view.set.dropdown_index(),
    };
}

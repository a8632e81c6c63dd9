use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::tasks::{Mode, TaskListView};
use crate::tui::worker::Request;

use super::*;

pub(super) fn handle_tag_dropdown(view: &mut TaskListView, key: KeyEvent) -> Transition {
    let Mode::TagDropdown { cursor } = view.mode else {
        return Transition::Stay;
    };
    if let Some(step) = list_step(&key) {
        view.mode = Mode::TagDropdown {
            cursor: step_cursor(cursor, step, view.set.dropdown_len()),
        };
        return Transition::Stay;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Enter) => {
            let choice = view.set.dropdown_choice(cursor);
            view.set.set_filter(choice);
            view.mode = Mode::Normal;
            view.reload();
        }
        (_, KeyCode::Esc) => view.mode = Mode::Normal,
        _ => {}
    }
    Transition::Stay
}

/// Immediate-write tag panel: each toggle is stored right away
pub(super) fn handle_assign_tags(view: &mut TaskListView, key: KeyEvent) -> Transition {
    let Mode::AssigningTags { task_id, cursor } = view.mode else {
        return Transition::Stay;
    };
    if let Some(step) = list_step(&key) {
        view.mode = Mode::AssigningTags {
            task_id,
            cursor: step_cursor(cursor, step, view.set.tags.len()),
        };
        return Transition::Stay;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char(' ')) => {
            let Some(tag_id) = view.set.tags.get(cursor).map(|t| t.id) else {
                return Transition::Stay;
            };
            let Some(task) = view.set.task(task_id) else {
                view.mode = Mode::Normal;
                return Transition::Stay;
            };
            let on = !task.has_tag(tag_id);
            view.request(Request::SetTaskTag {
                task_id,
                tag_id,
                on,
            });
        }
        (_, KeyCode::Esc) => view.mode = Mode::Normal,
        _ => {}
    }
    Transition::Stay
}

/// Any key closes help and is swallowed
pub(super) fn handle_help(view: &mut TaskListView) -> Transition {
    if let Mode::Help { prior } = std::mem::replace(&mut view.mode, Mode::Normal) {
        view.mode = *prior;
    }
    Transition::Stay
}

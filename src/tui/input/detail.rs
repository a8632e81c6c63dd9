use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::tasks::{Mode, TaskListView};
use crate::tui::worker::Request;

use super::*;

pub(super) fn handle_detail(view: &mut TaskListView, key: KeyEvent) -> Transition {
    let Mode::Viewing(session) = &mut view.mode else {
        return Transition::Stay;
    };
    let task_id = session.task_id;

    if session.composing {
        if is_save(&key) {
            if let Some(content) = session.submission() {
                view.request(Request::AddComment { task_id, content });
            }
        } else if key.code == KeyCode::Esc {
            // Draft text stays for later
            session.composing = false;
        } else {
            session.input.handle_key(key);
        }
        return Transition::Stay;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => view.mode = Mode::Normal,
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Transition::Quit,
        (KeyModifiers::NONE, KeyCode::Char('e')) => view.start_edit(task_id),
        (KeyModifiers::NONE, KeyCode::Char('d')) => view.confirm_delete(task_id),
        (KeyModifiers::NONE, KeyCode::Char('t')) => view.assign_tags(task_id),
        (KeyModifiers::NONE, KeyCode::Char('c') | KeyCode::Char('a')) => session.composing = true,
        (KeyModifiers::NONE, KeyCode::Char('?')) => view.open_help(),
        _ => {}
    }
    Transition::Stay
}

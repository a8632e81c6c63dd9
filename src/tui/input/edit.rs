use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::tasks::{EditField, EnterAction, Mode, TaskListView};
use crate::tui::worker::Request;

use super::*;

pub(super) fn handle_edit(view: &mut TaskListView, key: KeyEvent) -> Transition {
    if is_save(&key) {
        save_draft(view);
        return Transition::Stay;
    }
    let tags = &view.set.tags;
    let Mode::Editing(session) = &mut view.mode else {
        return Transition::Stay;
    };

    match (key.modifiers, key.code) {
        // Cancel never writes
        (_, KeyCode::Esc) => {
            view.mode = Mode::Normal;
        }
        (KeyModifiers::NONE, KeyCode::Tab) => session.field = session.field.next(),
        (_, KeyCode::BackTab) => session.field = session.field.prev(),
        (KeyModifiers::NONE, KeyCode::Enter) => match session.field.enter_action() {
            EnterAction::Advance => session.field = session.field.next(),
            EnterAction::Newline => {
                if let Some(buf) = session.focused_buffer() {
                    buf.insert_newline();
                }
            }
            EnterAction::ToggleTag => {
                if let Some(tag) = tags.get(session.tag_cursor) {
                    session.toggle_tag(tag.id);
                }
            }
            EnterAction::Submit => save_draft(view),
        },
        _ if session.field == EditField::Tags => {
            if let Some(step) = list_step(&key) {
                session.move_tag_cursor(step, tags.len());
            } else if key.code == KeyCode::Char(' ')
                && let Some(tag) = tags.get(session.tag_cursor)
            {
                session.toggle_tag(tag.id);
            }
        }
        (_, KeyCode::Char(c)) if !session.field.accepts(c) => {}
        _ => {
            if let Some(buf) = session.focused_buffer() {
                buf.handle_key(key);
            }
        }
    }
    Transition::Stay
}

/// Leave the form and write the draft. A blank title drops it instead.
pub(super) fn save_draft(view: &mut TaskListView) {
    let Mode::Editing(session) = std::mem::replace(&mut view.mode, Mode::Normal) else {
        return;
    };
    match session.to_save(view.project.id) {
        Some(save) => view.request(Request::SaveTask(save)),
        None => tracing::debug!("blank title; draft discarded"),
    }
}

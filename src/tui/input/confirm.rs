use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::tasks::{Mode, TaskListView};
use crate::tui::worker::Request;

pub(super) fn handle_confirm_delete(view: &mut TaskListView, key: KeyEvent) -> Transition {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y') | KeyCode::Char('Y')) => {
            if let Mode::ConfirmingDelete { task_id, title } =
                std::mem::replace(&mut view.mode, Mode::Normal)
            {
                tracing::info!(task_id, title = %title, "deleting task");
                view.request(Request::DeleteTask { id: task_id });
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n') | KeyCode::Char('N')) | (_, KeyCode::Esc) => {
            view.mode = Mode::Normal;
        }
        _ => {}
    }
    Transition::Stay
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::tasks::{Focus, TaskListView};

/// Keys while the search box has focus. Every edit reloads the list.
pub(super) fn handle_search(view: &mut TaskListView, key: KeyEvent) -> Transition {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => view.focus = Focus::List,
        (KeyModifiers::NONE, KeyCode::Enter) => {
            view.focus = Focus::List;
            view.reload();
        }
        (KeyModifiers::NONE, KeyCode::Tab) => view.focus = view.focus.next(),
        (_, KeyCode::BackTab) => view.focus = view.focus.prev(),
        _ => {
            if view.set.search.handle_key(key) {
                view.reload();
            }
        }
    }
    Transition::Stay
}

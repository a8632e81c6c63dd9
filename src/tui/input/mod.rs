mod common;
mod confirm;
mod detail;
mod edit;
mod navigate;
mod popups;
mod projects;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Transition;
use super::projects::ProjectListView;
use super::tasks::{Mode, TaskListView};

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use common::*;
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use detail::*;
#[allow(unused_imports)]
use edit::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use popups::*;
#[allow(unused_imports)]
use projects::*;
#[allow(unused_imports)]
use search::*;

/// Route a key on the task screen to the handler for the current mode
pub fn handle_task_key(view: &mut TaskListView, key: KeyEvent) -> Transition {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Transition::Stay;
    }
    view.status = None;

    let key = normalize_key(key);
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return Transition::Quit;
    }
    match view.mode {
        Mode::Normal => handle_navigate(view, key),
        Mode::TagDropdown { .. } => handle_tag_dropdown(view, key),
        Mode::Editing(_) => handle_edit(view, key),
        Mode::Viewing(_) => handle_detail(view, key),
        Mode::AssigningTags { .. } => handle_assign_tags(view, key),
        Mode::ConfirmingDelete { .. } => handle_confirm_delete(view, key),
        Mode::Help { .. } => handle_help(view),
    }
}

/// Route a key on the project list
pub fn handle_project_key(view: &mut ProjectListView, key: KeyEvent) -> Transition {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Transition::Stay;
    }
    view.status = None;

    let key = normalize_key(key);
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return Transition::Quit;
    }
    handle_projects(view, key)
}

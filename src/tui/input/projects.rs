use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::Transition;
use crate::tui::projects::{FormField, ProjectForm, ProjectListView, ProjectMode};
use crate::tui::worker::Request;

use super::*;

pub(super) fn handle_projects(view: &mut ProjectListView, key: KeyEvent) -> Transition {
    match view.mode {
        ProjectMode::Browse => handle_browse(view, key),
        ProjectMode::Form(_) => {
            handle_form(view, key);
            Transition::Stay
        }
        ProjectMode::ConfirmDelete { .. } => {
            handle_confirm_project_delete(view, key);
            Transition::Stay
        }
        ProjectMode::Help => {
            view.mode = ProjectMode::Browse;
            Transition::Stay
        }
    }
}

fn handle_browse(view: &mut ProjectListView, key: KeyEvent) -> Transition {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Transition::Quit,
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => view.scroll.up(),
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => view.scroll.down(),
        (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => view.scroll.first(),
        (KeyModifiers::NONE, KeyCode::Char('G') | KeyCode::End) => view.scroll.last(),
        (KeyModifiers::NONE, KeyCode::Enter) => {
            if let Some(project) = view.selected() {
                return Transition::OpenProject(project.clone());
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) => {
            view.mode = ProjectMode::Form(ProjectForm::create());
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => {
            if let Some(project) = view.selected() {
                view.mode = ProjectMode::Form(ProjectForm::edit(project));
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            if let Some(project) = view.selected() {
                view.mode = ProjectMode::ConfirmDelete {
                    project_id: project.id,
                    title: project.title.clone(),
                };
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('?')) => view.mode = ProjectMode::Help,
        _ => {}
    }
    Transition::Stay
}

fn handle_form(view: &mut ProjectListView, key: KeyEvent) {
    if is_save(&key) {
        view.submit_form();
        return;
    }
    let ProjectMode::Form(form) = &mut view.mode else {
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => view.mode = ProjectMode::Browse,
        (KeyModifiers::NONE, KeyCode::Tab) | (_, KeyCode::BackTab) => form.toggle_field(),
        (KeyModifiers::NONE, KeyCode::Enter) => match form.field {
            FormField::Title => form.field = FormField::Description,
            FormField::Description => view.submit_form(),
        },
        _ => {
            form.focused_buffer().handle_key(key);
        }
    }
}

fn handle_confirm_project_delete(view: &mut ProjectListView, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y') | KeyCode::Char('Y')) => {
            if let ProjectMode::ConfirmDelete { project_id, title } =
                std::mem::replace(&mut view.mode, ProjectMode::Browse)
            {
                tracing::info!(project_id, title = %title, "deleting project");
                view.request(Request::DeleteProject { id: project_id });
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('n') | KeyCode::Char('N')) | (_, KeyCode::Esc) => {
            view.mode = ProjectMode::Browse;
        }
        _ => {}
    }
}

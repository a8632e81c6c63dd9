pub mod app;
pub mod input;
pub mod projects;
pub mod render;
pub mod scroll;
pub mod tasks;
pub mod text;
pub mod theme;
pub mod worker;

pub use app::run;

use crate::model::Project;

/// What a screen asks the app shell to do after handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Quit,
    BackToProjects,
    OpenProject(Project),
}

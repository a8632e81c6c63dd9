pub mod config;
pub mod project;
pub mod tag;
pub mod task;

pub use config::*;
pub use project::*;
pub use tag::*;
pub use task::*;

pub mod config_io;
pub mod logging;
pub mod paths;

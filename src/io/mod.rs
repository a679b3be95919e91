pub mod config_io;
pub mod github;
pub mod report_io;
pub mod token;

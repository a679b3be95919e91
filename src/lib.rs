pub mod cli;
pub mod error;
pub mod io;
pub mod model;
pub mod ops;
pub mod report;
pub mod util;

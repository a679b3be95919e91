pub mod classify;
pub mod timestamp;
pub mod window;

pub mod change;
pub mod config;
pub mod impacted;
pub mod item;
pub mod window;

pub use change::*;
pub use config::*;
pub use impacted::*;
pub use item::*;
pub use window::*;

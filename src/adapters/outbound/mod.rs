pub mod console_display;
pub mod sim_backend;

pub use console_display::*;
pub use sim_backend::*;

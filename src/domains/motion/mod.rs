pub mod cartesian;
pub mod ports;
pub mod random;
pub mod session;
pub mod trajectory;
pub mod trials;
pub mod types;

pub use cartesian::*;
pub use ports::*;
pub use random::*;
pub use session::*;
pub use trajectory::*;
pub use trials::*;
pub use types::*;

pub mod cancel;
pub mod frame;
pub mod timer;

pub use cancel::*;
pub use frame::*;
pub use timer::*;

pub mod buffer;
pub mod camera;
pub mod object;
pub mod picking;
pub mod world;

pub use buffer::*;
pub use camera::*;
pub use object::*;
pub use picking::*;
pub use world::*;

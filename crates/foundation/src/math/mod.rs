pub mod ease;
pub mod geo;
pub mod vec;

pub use ease::*;
pub use geo::*;
pub use vec::*;

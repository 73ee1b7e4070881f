pub mod boundary;
pub mod centroid;
pub mod highlight;
pub mod labels;

pub use boundary::*;
pub use centroid::*;
pub use highlight::*;
pub use labels::*;

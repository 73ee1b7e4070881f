pub mod countries;
pub mod normalize;
pub mod stop;

pub use countries::*;
pub use normalize::*;
pub use stop::*;

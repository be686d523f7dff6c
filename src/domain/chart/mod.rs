//! Chart aggregate: series kinds, surface options, theme values and the
//! ports the lifecycle manager drives.

pub mod ports;
pub mod series;
pub mod value_objects;

pub use ports::*;
pub use series::*;
pub use value_objects::*;

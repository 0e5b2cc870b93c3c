pub mod device;
pub mod range;

pub mod logic;
pub mod normalize;
pub mod unit;

pub use normalize::normalize;
pub use unit::{ExteriorType, UnitRecord};

pub mod position;
pub mod registry;

pub use position::{CollateralPosition, CollateralType};
pub use registry::{total_market_value, PositionRegistry};

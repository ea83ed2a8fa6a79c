pub mod duration;
pub mod normal;
pub mod volatility;

pub use duration::estimate_duration;
pub use normal::{inverse_normal_cdf, standard_normal_sample};
pub use volatility::portfolio_volatility;

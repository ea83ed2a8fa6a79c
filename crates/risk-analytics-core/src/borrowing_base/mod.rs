pub mod calculator;
pub mod sensitivity;

pub use calculator::{compute_borrowing_base, BorrowingBaseCalc, BorrowingBaseLine};
pub use sensitivity::{default_sensitivity_shocks, run_sensitivity, SensitivityPoint};

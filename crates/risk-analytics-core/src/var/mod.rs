pub mod calculator;

pub use calculator::{compute_var, VarParams, VarResult};

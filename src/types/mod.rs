pub mod backtest;
pub mod cycle;
pub mod market;
pub mod profile;

pub use backtest::*;
pub use cycle::*;
pub use market::*;
pub use profile::*;

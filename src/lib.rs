pub mod analytics;
pub mod charts;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod types;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};

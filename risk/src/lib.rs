pub mod config;
pub mod error;
pub mod estimator;
pub mod finite_difference;

pub use config::BumpSizes;
pub use error::RiskError;
pub use estimator::{Greeks, SensitivityEstimator};

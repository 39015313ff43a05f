mod european_option;
mod gbm;
pub mod monte_carlo;

pub use european_option::MonteCarloEuropeanOption;
pub use gbm::GeometricBrownianMotion;
pub use monte_carlo::{MonteCarloPathSimulator, PathEvaluator};
